//! Match snapshot consumed and produced by the delivery engine.

use super::{Player, PlayerId, Team, TeamSide};
use crate::config::MatchConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wickets that end an innings (all out).
pub const ALL_OUT_WICKETS: u32 = 10;

/// A role the driver must fill before the next delivery.
///
/// `Empty` is the "selection required" signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "player_id", rename_all = "snake_case")]
pub enum RoleSlot {
    #[default]
    Empty,
    Bound(PlayerId),
}

impl RoleSlot {
    pub fn id(&self) -> Option<PlayerId> {
        match self {
            RoleSlot::Empty => None,
            RoleSlot::Bound(id) => Some(*id),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, RoleSlot::Bound(_))
    }

    pub fn is_empty(&self) -> bool {
        !self.is_bound()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Innings {
    #[default]
    First,
    Second,
}

impl Innings {
    pub fn number(&self) -> u8 {
        match self {
            Innings::First => 1,
            Innings::Second => 2,
        }
    }
}

/// Final result of a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Chasing side reached the target.
    WonByWickets { team: String, wickets: u32 },
    Tied,
    /// Defending side held the chase short.
    WonByRuns { team: String, runs: u32 },
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::WonByWickets { team, wickets } => {
                write!(f, "{} wins by {} wickets", team, wickets)
            }
            MatchOutcome::Tied => write!(f, "Match tied"),
            MatchOutcome::WonByRuns { team, runs } => write!(f, "{} wins by {} runs", team, runs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub team_a: Team,
    pub team_b: Team,
    /// `None` until the batting choice is made.
    pub batting_side: Option<TeamSide>,
    pub striker: RoleSlot,
    pub non_striker: RoleSlot,
    pub current_bowler: RoleSlot,
    /// Bowler of the over just completed; barred from the next one.
    pub previous_bowler: Option<PlayerId>,
    pub current_innings: Innings,
    /// Overs per innings.
    pub overs: u32,
    pub max_overs_per_bowler: u32,
    pub target: Option<u32>,
    pub is_match_started: bool,
    pub is_match_completed: bool,
    pub result: Option<MatchOutcome>,
}

impl MatchState {
    pub fn new(team_a: Team, team_b: Team, config: &MatchConfig) -> Self {
        Self {
            team_a,
            team_b,
            batting_side: None,
            striker: RoleSlot::Empty,
            non_striker: RoleSlot::Empty,
            current_bowler: RoleSlot::Empty,
            previous_bowler: None,
            current_innings: Innings::First,
            overs: config.overs,
            max_overs_per_bowler: config.max_overs_per_bowler,
            target: None,
            is_match_started: false,
            is_match_completed: false,
            result: None,
        }
    }

    /// Bind the batting side for the first innings and start the match.
    pub fn with_batting_first(mut self, side: TeamSide) -> Self {
        self.batting_side = Some(side);
        self.is_match_started = true;
        self
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::A => &self.team_a,
            TeamSide::B => &self.team_b,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::A => &mut self.team_a,
            TeamSide::B => &mut self.team_b,
        }
    }

    pub fn bowling_side(&self) -> Option<TeamSide> {
        self.batting_side.map(TeamSide::other)
    }

    pub fn batting_team(&self) -> Option<&Team> {
        self.batting_side.map(|side| self.team(side))
    }

    pub fn bowling_team(&self) -> Option<&Team> {
        self.bowling_side().map(|side| self.team(side))
    }

    pub fn striker_player(&self) -> Option<&Player> {
        self.batting_team()?.player(self.striker.id()?)
    }

    pub fn non_striker_player(&self) -> Option<&Player> {
        self.batting_team()?.player(self.non_striker.id()?)
    }

    pub fn bowler_player(&self) -> Option<&Player> {
        self.bowling_team()?.player(self.current_bowler.id()?)
    }

    /// All three on-field roles bound and sides chosen.
    pub fn roles_bound(&self) -> bool {
        self.batting_side.is_some()
            && self.striker.is_bound()
            && self.non_striker.is_bound()
            && self.current_bowler.is_bound()
    }

    /// True when the driver must pick a player before the next delivery.
    pub fn needs_selection(&self) -> bool {
        self.is_match_started && !self.is_match_completed && !self.roles_bound()
    }

    pub fn result_text(&self) -> Option<String> {
        self.result.as_ref().map(ToString::to_string)
    }
}
