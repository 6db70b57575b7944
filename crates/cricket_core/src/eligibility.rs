//! Selection predicates for incoming batsmen and the next over's bowler.

use crate::models::{MatchState, Overs, Player, PlayerId, Team};

/// Players who have not batted yet this innings.
///
/// A not-out player with balls faced is already at the crease, so they are
/// never offered as a new batsman.
pub fn available_batsmen(team: &Team) -> Vec<&Player> {
    team.players
        .iter()
        .filter(|p| !p.is_out() && p.batting_figures.balls_faced == 0)
        .collect()
}

/// A bowler is eligible while under the per-bowler cap and not the bowler
/// of the previous over. The cap is only consulted at over boundaries.
pub fn can_bowl(player: &Player, state: &MatchState, previous_bowler: Option<PlayerId>) -> bool {
    if player.overs_bowled().reached(state.max_overs_per_bowler) {
        return false;
    }
    previous_bowler != Some(player.id)
}

pub fn available_bowlers<'a>(
    team: &'a Team,
    state: &MatchState,
    previous_bowler: Option<PlayerId>,
) -> Vec<&'a Player> {
    team.players
        .iter()
        .filter(|p| can_bowl(p, state, previous_bowler))
        .collect()
}

/// Overs a bowler may still bowl this innings.
pub fn overs_left(player: &Player, state: &MatchState) -> Overs {
    Overs::whole(state.max_overs_per_bowler).saturating_sub(player.overs_bowled())
}

impl MatchState {
    /// Candidates for an empty batting slot: not yet batted and not
    /// currently bound to the other slot.
    pub fn incoming_batsmen(&self) -> Vec<&Player> {
        let Some(team) = self.batting_team() else {
            return Vec::new();
        };
        let bound = [self.striker.id(), self.non_striker.id()];
        available_batsmen(team)
            .into_iter()
            .filter(|p| !bound.contains(&Some(p.id)))
            .collect()
    }

    /// Candidates for the next over, honouring the previous-over rule.
    pub fn eligible_bowlers(&self) -> Vec<&Player> {
        match self.bowling_team() {
            Some(team) => available_bowlers(team, self, self.previous_bowler),
            None => Vec::new(),
        }
    }
}
