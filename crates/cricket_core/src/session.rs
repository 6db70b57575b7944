//! Match session: the driver-side state machine around the engine.
//!
//! The session holds the current [`MatchState`] and a [`MatchStep`] marker,
//! validates player selections against the eligibility rules and feeds
//! deliveries to the engine. The engine itself stays permissive; the
//! session is where bad selections are rejected.

use crate::config::MatchConfig;
use crate::engine::{process_delivery_with_event, DeliveryEvent};
use crate::models::{Innings, MatchOutcome, MatchState, PlayerId, RoleSlot, Team, TeamSide};
use crate::roster::{build_team, initialize_teams};
use crate::sampler::{sample_outcome, DeliveryOutcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where the driver is in the match flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStep {
    RosterImport,
    TeamSelection,
    TossSelection,
    /// Player selection required.
    Batting,
    FirstInnings,
    SecondInnings,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Striker,
    NonStriker,
    Bowler,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Striker => f.write_str("striker"),
            Role::NonStriker => f.write_str("non-striker"),
            Role::Bowler => f.write_str("bowler"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Generate both rosters from a seed.
    InitializeMatch { seed: u64 },
    /// Build both rosters from imported rows.
    InitializeMatchWithData {
        headers: Vec<String>,
        team_a: Vec<Vec<String>>,
        team_b: Vec<Vec<String>>,
    },
    ConfirmTeams,
    SetBattingTeam(TeamSide),
    SelectStriker(PlayerId),
    SelectNonStriker(PlayerId),
    SelectBowler(PlayerId),
    ProcessDelivery(DeliveryOutcome),
    SetMatchStep(MatchStep),
    ResetMatch,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Teams have not been loaded")]
    TeamsNotLoaded,

    #[error("Roster for {team} has {found} players, at least {required} required")]
    RosterTooSmall {
        team: String,
        found: usize,
        required: usize,
    },

    #[error("Match has not started")]
    NotStarted,

    #[error("Match has already started")]
    AlreadyStarted,

    #[error("Match is completed")]
    Completed,

    #[error("The {role} slot is already filled")]
    SlotFilled { role: Role },

    #[error("Player {id} is not in the {team} roster")]
    UnknownPlayer { id: PlayerId, team: String },

    #[error("Player {id} is not available to bat")]
    NotAvailableToBat { id: PlayerId },

    #[error("Player {id} cannot bowl the next over")]
    NotEligibleToBowl { id: PlayerId },

    #[error("No eligible {role} left")]
    NoCandidates { role: Role },

    #[error("Striker, non-striker and bowler must all be selected")]
    RolesUnbound,

    #[error("{team} has {bowlers} bowlers, too few to bowl {overs} overs at {cap} each")]
    TooFewBowlers {
        team: String,
        bowlers: usize,
        overs: u32,
        cap: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSession {
    config: MatchConfig,
    state: MatchState,
    step: MatchStep,
    history: Vec<DeliveryEvent>,
}

impl MatchSession {
    pub fn new(config: MatchConfig) -> Self {
        let state = MatchState::new(
            Team::new("Team A", Vec::new()),
            Team::new("Team B", Vec::new()),
            &config,
        );
        Self {
            config,
            state,
            step: MatchStep::RosterImport,
            history: Vec::new(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn step(&self) -> MatchStep {
        self.step
    }

    /// Every delivery applied so far, both innings.
    pub fn history(&self) -> &[DeliveryEvent] {
        &self.history
    }

    pub fn result(&self) -> Option<&MatchOutcome> {
        self.state.result.as_ref()
    }

    pub fn apply(&mut self, action: SessionAction) -> Result<(), SessionError> {
        match action {
            SessionAction::InitializeMatch { seed } => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let (team_a, team_b) = initialize_teams(&mut rng);
                self.load_teams(team_a, team_b)
            }
            SessionAction::InitializeMatchWithData { headers, team_a, team_b } => {
                let team_a = build_team("Team A", &team_a, &headers);
                let team_b = build_team("Team B", &team_b, &headers);
                self.load_teams(team_a, team_b)
            }
            SessionAction::ConfirmTeams => {
                self.require_teams()?;
                if self.state.is_match_started {
                    return Err(SessionError::AlreadyStarted);
                }
                self.step = MatchStep::TossSelection;
                Ok(())
            }
            SessionAction::SetBattingTeam(side) => {
                self.require_teams()?;
                if self.state.is_match_started {
                    return Err(SessionError::AlreadyStarted);
                }
                self.state = self.state.clone().with_batting_first(side);
                self.step = MatchStep::Batting;
                tracing::info!(batting = %self.state.team(side).name, "batting side chosen");
                Ok(())
            }
            SessionAction::SelectStriker(id) => self.select_batsman(Role::Striker, id),
            SessionAction::SelectNonStriker(id) => self.select_batsman(Role::NonStriker, id),
            SessionAction::SelectBowler(id) => self.select_bowler(id),
            SessionAction::ProcessDelivery(outcome) => self.deliver(outcome).map(|_| ()),
            SessionAction::SetMatchStep(step) => {
                self.step = step;
                Ok(())
            }
            SessionAction::ResetMatch => {
                *self = Self::new(self.config.clone());
                Ok(())
            }
        }
    }

    /// Replace both rosters and return to team selection.
    pub fn load_teams(&mut self, team_a: Team, team_b: Team) -> Result<(), SessionError> {
        let required = self.config.players_per_side;
        for team in [&team_a, &team_b] {
            if team.players.len() < required {
                return Err(SessionError::RosterTooSmall {
                    team: team.name.clone(),
                    found: team.players.len(),
                    required,
                });
            }
            if !self.config.bowlers_cover_innings(team.players.len()) {
                return Err(SessionError::TooFewBowlers {
                    team: team.name.clone(),
                    bowlers: team.players.len(),
                    overs: self.config.overs,
                    cap: self.config.max_overs_per_bowler,
                });
            }
        }
        self.state = MatchState::new(team_a, team_b, &self.config);
        self.step = MatchStep::TeamSelection;
        self.history.clear();
        Ok(())
    }

    fn require_teams(&self) -> Result<(), SessionError> {
        if self.state.team_a.players.is_empty() || self.state.team_b.players.is_empty() {
            return Err(SessionError::TeamsNotLoaded);
        }
        Ok(())
    }

    fn require_live(&self) -> Result<(), SessionError> {
        if self.state.is_match_completed {
            return Err(SessionError::Completed);
        }
        if !self.state.is_match_started {
            return Err(SessionError::NotStarted);
        }
        Ok(())
    }

    fn select_batsman(&mut self, role: Role, id: PlayerId) -> Result<(), SessionError> {
        self.require_live()?;
        let slot = match role {
            Role::Striker => self.state.striker,
            _ => self.state.non_striker,
        };
        if slot.is_bound() {
            return Err(SessionError::SlotFilled { role });
        }

        let team = self.state.batting_team().ok_or(SessionError::NotStarted)?;
        if team.player(id).is_none() {
            return Err(SessionError::UnknownPlayer { id, team: team.name.clone() });
        }
        if !self.state.incoming_batsmen().iter().any(|p| p.id == id) {
            return Err(SessionError::NotAvailableToBat { id });
        }

        match role {
            Role::Striker => self.state.striker = RoleSlot::Bound(id),
            _ => self.state.non_striker = RoleSlot::Bound(id),
        }
        tracing::debug!(%role, id, "batsman selected");
        self.refresh_step();
        Ok(())
    }

    fn select_bowler(&mut self, id: PlayerId) -> Result<(), SessionError> {
        self.require_live()?;
        if self.state.current_bowler.is_bound() {
            return Err(SessionError::SlotFilled { role: Role::Bowler });
        }

        let team = self.state.bowling_team().ok_or(SessionError::NotStarted)?;
        if team.player(id).is_none() {
            return Err(SessionError::UnknownPlayer { id, team: team.name.clone() });
        }
        if !self.state.eligible_bowlers().iter().any(|p| p.id == id) {
            return Err(SessionError::NotEligibleToBowl { id });
        }

        self.state.current_bowler = RoleSlot::Bound(id);
        tracing::debug!(id, "bowler selected");
        self.refresh_step();
        Ok(())
    }

    /// Feed one delivery to the engine and advance the step marker.
    pub fn deliver(&mut self, outcome: DeliveryOutcome) -> Result<&DeliveryEvent, SessionError> {
        self.require_live()?;
        if !self.state.roles_bound() {
            return Err(SessionError::RolesUnbound);
        }

        let (next, event) = process_delivery_with_event(&self.state, outcome);
        let event = event.ok_or(SessionError::RolesUnbound)?;
        self.state = next;
        self.history.push(event);
        self.refresh_step();

        self.history.last().ok_or(SessionError::RolesUnbound)
    }

    fn refresh_step(&mut self) {
        self.step = if self.state.is_match_completed {
            MatchStep::Result
        } else if !self.state.roles_bound() {
            MatchStep::Batting
        } else {
            match self.state.current_innings {
                Innings::First => MatchStep::FirstInnings,
                Innings::Second => MatchStep::SecondInnings,
            }
        };
    }

    /// Sample and apply one delivery.
    pub fn simulate_delivery(&mut self, rng: &mut impl Rng) -> Result<DeliveryOutcome, SessionError> {
        let outcome = sample_outcome(rng);
        self.deliver(outcome)?;
        Ok(outcome)
    }

    /// Simulate until six legal deliveries have been bowled, a selection is
    /// required, or the match ends. Returns the outcomes issued.
    pub fn simulate_over(&mut self, rng: &mut impl Rng) -> Result<Vec<DeliveryOutcome>, SessionError> {
        self.require_live()?;
        if !self.state.roles_bound() {
            return Err(SessionError::RolesUnbound);
        }

        let mut outcomes = Vec::new();
        let mut legal = 0;
        while self.state.roles_bound() && !self.state.is_match_completed {
            let outcome = self.simulate_delivery(rng)?;
            outcomes.push(outcome);
            if outcome.is_legal() {
                legal += 1;
            }
            if legal >= 6 {
                break;
            }
        }
        Ok(outcomes)
    }

    /// Fill every empty role automatically.
    ///
    /// Batsmen come in roster order. The bowler is the eligible player with
    /// the fewest balls bowled, ties broken by roster order.
    pub fn auto_select(&mut self) -> Result<(), SessionError> {
        self.require_live()?;

        if self.state.striker.is_empty() {
            let id = self.first_incoming(Role::Striker)?;
            self.apply(SessionAction::SelectStriker(id))?;
        }
        if self.state.non_striker.is_empty() {
            let id = self.first_incoming(Role::NonStriker)?;
            self.apply(SessionAction::SelectNonStriker(id))?;
        }
        if self.state.current_bowler.is_empty() {
            let id = self
                .state
                .eligible_bowlers()
                .into_iter()
                .min_by_key(|p| p.bowling_figures.balls_bowled)
                .map(|p| p.id)
                .ok_or(SessionError::NoCandidates { role: Role::Bowler })?;
            self.apply(SessionAction::SelectBowler(id))?;
        }
        Ok(())
    }

    fn first_incoming(&self, role: Role) -> Result<PlayerId, SessionError> {
        self.state
            .incoming_batsmen()
            .first()
            .map(|p| p.id)
            .ok_or(SessionError::NoCandidates { role })
    }

    /// Auto-select and simulate until the match completes.
    pub fn play_out(&mut self, rng: &mut impl Rng) -> Result<MatchOutcome, SessionError> {
        while !self.state.is_match_completed {
            self.auto_select()?;
            self.simulate_delivery(rng)?;
        }
        self.state.result.clone().ok_or(SessionError::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> MatchSession {
        let mut s = MatchSession::new(MatchConfig::default());
        s.apply(SessionAction::InitializeMatch { seed: 5 }).unwrap();
        s
    }

    fn ready() -> MatchSession {
        let mut s = loaded();
        s.apply(SessionAction::ConfirmTeams).unwrap();
        s.apply(SessionAction::SetBattingTeam(TeamSide::A)).unwrap();
        s.apply(SessionAction::SelectStriker(1)).unwrap();
        s.apply(SessionAction::SelectNonStriker(2)).unwrap();
        s.apply(SessionAction::SelectBowler(100)).unwrap();
        s
    }

    #[test]
    fn test_step_flow_to_first_innings() {
        let mut s = MatchSession::new(MatchConfig::default());
        assert_eq!(s.step(), MatchStep::RosterImport);
        assert_eq!(s.apply(SessionAction::ConfirmTeams), Err(SessionError::TeamsNotLoaded));

        s.apply(SessionAction::InitializeMatch { seed: 5 }).unwrap();
        assert_eq!(s.step(), MatchStep::TeamSelection);
        s.apply(SessionAction::ConfirmTeams).unwrap();
        assert_eq!(s.step(), MatchStep::TossSelection);
        s.apply(SessionAction::SetBattingTeam(TeamSide::A)).unwrap();
        assert_eq!(s.step(), MatchStep::Batting);
        s.apply(SessionAction::SelectStriker(1)).unwrap();
        s.apply(SessionAction::SelectNonStriker(2)).unwrap();
        assert_eq!(s.step(), MatchStep::Batting);
        s.apply(SessionAction::SelectBowler(100)).unwrap();
        assert_eq!(s.step(), MatchStep::FirstInnings);
    }

    #[test]
    fn test_import_rejects_short_roster() {
        let mut s = MatchSession::new(MatchConfig::default());
        let rows = vec![vec!["1".to_string(), "Solo".to_string()]];
        let err = s
            .apply(SessionAction::InitializeMatchWithData {
                headers: Vec::new(),
                team_a: rows.clone(),
                team_b: rows,
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::RosterTooSmall { found: 1, required: 11, .. }));
        assert_eq!(s.step(), MatchStep::RosterImport);
    }

    #[test]
    fn test_import_rejects_rosters_that_cannot_bowl_the_innings() {
        let config = MatchConfig {
            overs: 20,
            max_overs_per_bowler: 1,
            ..MatchConfig::default()
        };
        let mut s = MatchSession::new(config);
        let err = s.apply(SessionAction::InitializeMatch { seed: 5 }).unwrap_err();
        assert!(matches!(
            err,
            SessionError::TooFewBowlers { bowlers: 11, overs: 20, cap: 1, .. }
        ));
        assert_eq!(s.step(), MatchStep::RosterImport);
    }

    #[test]
    fn test_dismissed_batsman_cannot_return_under_a_shared_id() {
        let cells = |id: &str, name: &str| vec![id.to_string(), name.to_string()];
        let mut team_a = vec![cells("", "Blank"), cells("1", "Explicit")];
        team_a.extend((3..=11).map(|i| cells(&i.to_string(), &format!("A{i}"))));
        let team_b: Vec<_> = (100..=110).map(|i| cells(&i.to_string(), &format!("B{i}"))).collect();

        let mut s = MatchSession::new(MatchConfig::default());
        s.apply(SessionAction::InitializeMatchWithData {
            headers: Vec::new(),
            team_a,
            team_b,
        })
        .unwrap();
        s.apply(SessionAction::SetBattingTeam(TeamSide::A)).unwrap();
        s.apply(SessionAction::SelectStriker(1)).unwrap();
        s.apply(SessionAction::SelectNonStriker(2)).unwrap();
        s.apply(SessionAction::SelectBowler(100)).unwrap();
        s.apply(SessionAction::ProcessDelivery(DeliveryOutcome::Wicket)).unwrap();

        assert_eq!(
            s.apply(SessionAction::SelectStriker(1)),
            Err(SessionError::NotAvailableToBat { id: 1 })
        );
        let batting = s.state().batting_team().unwrap();
        assert_eq!(batting.player(2).unwrap().name, "Blank");
        assert!(batting.player(1).unwrap().is_out());
    }

    #[test]
    fn test_selection_rejections() {
        let mut s = loaded();
        assert_eq!(s.apply(SessionAction::SelectStriker(1)), Err(SessionError::NotStarted));

        s.apply(SessionAction::SetBattingTeam(TeamSide::A)).unwrap();
        assert_eq!(
            s.apply(SessionAction::SetBattingTeam(TeamSide::B)),
            Err(SessionError::AlreadyStarted)
        );
        assert!(matches!(
            s.apply(SessionAction::SelectStriker(100)),
            Err(SessionError::UnknownPlayer { id: 100, .. })
        ));
        s.apply(SessionAction::SelectStriker(1)).unwrap();
        assert_eq!(
            s.apply(SessionAction::SelectStriker(3)),
            Err(SessionError::SlotFilled { role: Role::Striker })
        );
        assert_eq!(
            s.apply(SessionAction::SelectNonStriker(1)),
            Err(SessionError::NotAvailableToBat { id: 1 })
        );
        assert!(matches!(
            s.apply(SessionAction::SelectBowler(1)),
            Err(SessionError::UnknownPlayer { id: 1, .. })
        ));
        assert_eq!(
            s.apply(SessionAction::ProcessDelivery(DeliveryOutcome::Dot)),
            Err(SessionError::RolesUnbound)
        );
    }

    #[test]
    fn test_same_bowler_cannot_take_consecutive_overs() {
        let mut s = ready();
        for _ in 0..6 {
            s.apply(SessionAction::ProcessDelivery(DeliveryOutcome::Dot)).unwrap();
        }
        assert_eq!(s.step(), MatchStep::Batting);
        assert_eq!(
            s.apply(SessionAction::SelectBowler(100)),
            Err(SessionError::NotEligibleToBowl { id: 100 })
        );
        s.apply(SessionAction::SelectBowler(101)).unwrap();
        assert_eq!(s.step(), MatchStep::FirstInnings);
    }

    #[test]
    fn test_wicket_requires_new_batsman() {
        let mut s = ready();
        let event = s.deliver(DeliveryOutcome::Wicket).unwrap().clone();
        assert_eq!(event.wickets, 1);
        assert_eq!(s.step(), MatchStep::Batting);
        assert_eq!(
            s.apply(SessionAction::SelectStriker(1)),
            Err(SessionError::NotAvailableToBat { id: 1 })
        );
        s.apply(SessionAction::SelectStriker(3)).unwrap();
        assert_eq!(s.step(), MatchStep::FirstInnings);
        assert_eq!(s.state().non_striker, RoleSlot::Bound(2));
    }

    #[test]
    fn test_simulate_over_stops_at_six_legal_balls() {
        let mut s = ready();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let outcomes = s.simulate_over(&mut rng).unwrap();
        let legal = outcomes.iter().filter(|o| o.is_legal()).count();
        let stopped_for_selection = !s.state().roles_bound();
        assert!(legal <= 6);
        assert!(legal == 6 || stopped_for_selection);
        assert_eq!(s.history().len(), outcomes.len());
    }

    #[test]
    fn test_play_out_reaches_result() {
        let mut s = ready();
        let mut rng = ChaCha8Rng::seed_from_u64(2025);
        let outcome = s.play_out(&mut rng).unwrap();
        assert_eq!(s.step(), MatchStep::Result);
        assert!(s.state().is_match_completed);
        assert_eq!(s.result(), Some(&outcome));
        assert_eq!(
            s.apply(SessionAction::ProcessDelivery(DeliveryOutcome::Dot)),
            Err(SessionError::Completed)
        );
    }

    #[test]
    fn test_reset_returns_to_import() {
        let mut s = ready();
        s.deliver(DeliveryOutcome::Four).unwrap();
        s.apply(SessionAction::ResetMatch).unwrap();
        assert_eq!(s.step(), MatchStep::RosterImport);
        assert!(s.history().is_empty());
        assert!(s.state().team_a.players.is_empty());
    }
}
