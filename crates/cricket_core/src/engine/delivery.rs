//! Delivery state transition.
//!
//! `process_delivery` is pure: it clones the snapshot, applies exactly one
//! delivery and returns the new snapshot. The input is never touched.

use crate::models::{
    Innings, MatchOutcome, MatchState, PlayerId, RoleSlot, Team, TeamSide, ALL_OUT_WICKETS,
    BALLS_PER_OVER,
};
use crate::sampler::DeliveryOutcome;
use serde::{Deserialize, Serialize};

/// Summary of one applied delivery, for commentary and ball-by-ball logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub innings: Innings,
    /// Cricket ball label, e.g. `"3.4"` for the fourth ball of the fourth over.
    pub ball: String,
    pub batting_team: String,
    pub bowler_id: PlayerId,
    pub striker_id: PlayerId,
    pub outcome: DeliveryOutcome,
    /// Runs added to the batting total.
    pub runs: u32,
    pub total_runs: u32,
    pub wickets: u32,
    pub over_completed: bool,
    pub innings_completed: bool,
    pub match_completed: bool,
}

/// Apply one delivery to `state`.
///
/// Returns an unchanged copy if the match is over or any role is unbound.
pub fn process_delivery(state: &MatchState, outcome: DeliveryOutcome) -> MatchState {
    process_delivery_with_event(state, outcome).0
}

/// Like [`process_delivery`], also reporting what happened. The event is
/// `None` when the delivery was not applied.
pub fn process_delivery_with_event(
    state: &MatchState,
    outcome: DeliveryOutcome,
) -> (MatchState, Option<DeliveryEvent>) {
    let mut next = state.clone();

    if state.is_match_completed {
        return (next, None);
    }

    let Some(bat_side) = state.batting_side else {
        return (next, None);
    };
    let (RoleSlot::Bound(striker_id), RoleSlot::Bound(non_striker_id), RoleSlot::Bound(bowler_id)) =
        (state.striker, state.non_striker, state.current_bowler)
    else {
        return (next, None);
    };
    let bowl_side = bat_side.other();

    if state.team(bat_side).player(striker_id).is_none()
        || state.team(bat_side).player(non_striker_id).is_none()
        || state.team(bowl_side).player(bowler_id).is_none()
    {
        tracing::warn!(
            striker_id,
            non_striker_id,
            bowler_id,
            "bound role does not belong to its side; delivery ignored"
        );
        return (next, None);
    }

    let balls_before = state.team(bat_side).balls;
    let ball = format!("{}.{}", balls_before / BALLS_PER_OVER, balls_before % BALLS_PER_OVER + 1);

    apply_batting(next.team_mut(bat_side), striker_id, outcome);
    apply_bowling(next.team_mut(bowl_side), bowler_id, outcome);

    if outcome.rotates_strike() {
        std::mem::swap(&mut next.striker, &mut next.non_striker);
    }
    if outcome == DeliveryOutcome::Wicket {
        next.striker = RoleSlot::Empty;
    }

    let over_completed = outcome.is_legal() && next.team(bat_side).overs().is_over_boundary();
    if over_completed {
        if next.striker.is_bound() && next.non_striker.is_bound() {
            std::mem::swap(&mut next.striker, &mut next.non_striker);
        }
        close_bowler_over(next.team_mut(bowl_side), bowler_id);
        next.current_bowler = RoleSlot::Empty;
        next.previous_bowler = Some(bowler_id);
        tracing::info!(
            innings = next.current_innings.number(),
            overs = %next.team(bat_side).overs(),
            score = %next.team(bat_side).score_line(),
            bowler_id,
            "over completed"
        );
    }

    let innings_before = next.current_innings;
    let innings_completed = settle_completion(&mut next, bat_side);

    // Only the incoming batting side is reset at an innings change, so this
    // still holds the totals of the innings the delivery belonged to.
    let after = next.team(bat_side);

    let event = DeliveryEvent {
        innings: innings_before,
        ball,
        batting_team: after.name.clone(),
        bowler_id,
        striker_id,
        outcome,
        runs: outcome.bat_runs() + outcome.extra_runs(),
        total_runs: after.total_runs,
        wickets: after.wickets,
        over_completed,
        innings_completed,
        match_completed: next.is_match_completed,
    };

    tracing::debug!(
        innings = innings_before.number(),
        ball = %event.ball,
        outcome = %outcome,
        striker_id,
        bowler_id,
        total = event.total_runs,
        wickets = event.wickets,
        "delivery processed"
    );

    (next, Some(event))
}

fn apply_batting(team: &mut Team, striker_id: PlayerId, outcome: DeliveryOutcome) {
    let bat_runs = outcome.bat_runs();
    let extras = outcome.extra_runs();

    team.total_runs += bat_runs + extras;
    team.extras += extras;

    if outcome.is_legal() {
        team.balls += 1;
    }
    if outcome == DeliveryOutcome::Wicket {
        team.wickets += 1;
    }

    // Illegal deliveries touch no batsman's figures.
    if !outcome.is_legal() {
        return;
    }
    if let Some(striker) = team.player_mut(striker_id) {
        let figures = &mut striker.batting_figures;
        figures.balls_faced += 1;
        figures.runs_scored += bat_runs;
        match outcome {
            DeliveryOutcome::Four => figures.fours += 1,
            DeliveryOutcome::Six => figures.sixes += 1,
            DeliveryOutcome::Wicket => figures.is_out = true,
            _ => {}
        }
    }
}

fn apply_bowling(team: &mut Team, bowler_id: PlayerId, outcome: DeliveryOutcome) {
    if let Some(bowler) = team.player_mut(bowler_id) {
        let figures = &mut bowler.bowling_figures;
        let runs = outcome.bat_runs() + outcome.extra_runs();
        figures.runs_conceded += runs;
        figures.over_runs += runs;
        if outcome.is_legal() {
            figures.balls_bowled += 1;
        }
        if outcome == DeliveryOutcome::Wicket {
            figures.wickets_taken += 1;
        }
    }
}

fn close_bowler_over(team: &mut Team, bowler_id: PlayerId) {
    if let Some(bowler) = team.player_mut(bowler_id) {
        let figures = &mut bowler.bowling_figures;
        if figures.over_runs == 0 {
            figures.maidens += 1;
        }
        figures.over_runs = 0;
    }
}

/// Single ordered completion decision: target reached first, then overs
/// or wickets exhausted. Returns true if the innings closed.
fn settle_completion(next: &mut MatchState, bat_side: TeamSide) -> bool {
    let batting = next.team(bat_side);
    let innings_exhausted =
        batting.overs().reached(next.overs) || batting.wickets >= ALL_OUT_WICKETS;

    match next.current_innings {
        Innings::Second => {
            let target = next.target.unwrap_or(0);
            let chased = next.target.is_some_and(|t| batting.total_runs >= t);
            if chased || innings_exhausted {
                let outcome = decide_result(batting, next.team(bat_side.other()), target);
                complete_match(next, outcome);
                true
            } else {
                false
            }
        }
        Innings::First => {
            if innings_exhausted {
                start_second_innings(next, bat_side);
                true
            } else {
                false
            }
        }
    }
}

/// Result of a finished chase.
pub fn decide_result(batting: &Team, bowling: &Team, target: u32) -> MatchOutcome {
    let runs = batting.total_runs;
    if runs >= target {
        MatchOutcome::WonByWickets {
            team: batting.name.clone(),
            wickets: ALL_OUT_WICKETS.saturating_sub(batting.wickets),
        }
    } else if runs + 1 == target {
        MatchOutcome::Tied
    } else {
        MatchOutcome::WonByRuns {
            team: bowling.name.clone(),
            runs: target - runs - 1,
        }
    }
}

fn complete_match(next: &mut MatchState, outcome: MatchOutcome) {
    tracing::info!(result = %outcome, "match completed");
    next.is_match_completed = true;
    next.result = Some(outcome);
}

fn start_second_innings(next: &mut MatchState, bat_side: TeamSide) {
    let first_innings_total = next.team(bat_side).total_runs;
    let target = first_innings_total + 1;
    let new_bat_side = bat_side.other();

    tracing::info!(
        team = %next.team(bat_side).name,
        score = %next.team(bat_side).score_line(),
        overs = %next.team(bat_side).overs(),
        target,
        "first innings closed"
    );

    next.current_innings = Innings::Second;
    next.target = Some(target);
    next.batting_side = Some(new_bat_side);
    next.team_mut(new_bat_side).reset_for_batting();
    next.team_mut(bat_side).reset_for_bowling();
    next.striker = RoleSlot::Empty;
    next.non_striker = RoleSlot::Empty;
    next.current_bowler = RoleSlot::Empty;
    next.previous_bowler = None;
}
