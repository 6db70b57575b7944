//! Read-only views derived from a match snapshot: the live scoreboard and
//! per-team scorecards. Every rate is 0 when its denominator is 0.

use crate::models::{Innings, MatchState, Overs, Player, Team};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `runs` per six legal balls.
pub fn run_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    runs as f64 * 6.0 / balls as f64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterLine {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub is_out: bool,
}

impl From<&Player> for BatterLine {
    fn from(p: &Player) -> Self {
        let f = &p.batting_figures;
        Self {
            name: p.name.clone(),
            runs: f.runs_scored,
            balls: f.balls_faced,
            fours: f.fours,
            sixes: f.sixes,
            strike_rate: p.strike_rate(),
            is_out: f.is_out,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerLine {
    pub name: String,
    pub overs: String,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
}

impl From<&Player> for BowlerLine {
    fn from(p: &Player) -> Self {
        let f = &p.bowling_figures;
        Self {
            name: p.name.clone(),
            overs: p.overs_bowled().to_string(),
            maidens: f.maidens,
            runs: f.runs_conceded,
            wickets: f.wickets_taken,
            economy: p.economy(),
        }
    }
}

/// Live view of the innings in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub batting_team: String,
    pub bowling_team: String,
    pub innings: Innings,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub extras: u32,
    pub current_run_rate: f64,
    pub overs_remaining: String,
    pub balls_remaining: u32,
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
    pub required_run_rate: Option<f64>,
    pub striker: Option<BatterLine>,
    pub non_striker: Option<BatterLine>,
    pub bowler: Option<BowlerLine>,
    pub result: Option<String>,
}

impl Scoreboard {
    /// `None` until the batting side is chosen.
    pub fn from_match(state: &MatchState) -> Option<Self> {
        let batting = state.batting_team()?;
        let bowling = state.bowling_team()?;

        let remaining = Overs::whole(state.overs).saturating_sub(batting.overs());
        let chase = match (state.current_innings, state.target) {
            (Innings::Second, Some(target)) => Some(target),
            _ => None,
        };
        let runs_required = chase.map(|t| t.saturating_sub(batting.total_runs));

        Some(Self {
            batting_team: batting.name.clone(),
            bowling_team: bowling.name.clone(),
            innings: state.current_innings,
            runs: batting.total_runs,
            wickets: batting.wickets,
            overs: batting.overs().to_string(),
            extras: batting.extras,
            current_run_rate: run_rate(batting.total_runs, batting.balls),
            overs_remaining: remaining.to_string(),
            balls_remaining: remaining.balls(),
            target: chase,
            runs_required,
            required_run_rate: runs_required.map(|r| run_rate(r, remaining.balls())),
            striker: state.striker_player().map(BatterLine::from),
            non_striker: state.non_striker_player().map(BatterLine::from),
            bowler: state.bowler_player().map(BowlerLine::from),
            result: state.result_text(),
        })
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let innings = match self.innings {
            Innings::First => "First Innings",
            Innings::Second => "Second Innings",
        };
        writeln!(
            f,
            "{} {}/{} ({} ov)  {}",
            self.batting_team, self.runs, self.wickets, self.overs, innings
        )?;
        write!(f, "CRR: {:.2}  Extras: {}", self.current_run_rate, self.extras)?;
        if let (Some(required), Some(rrr)) = (self.runs_required, self.required_run_rate) {
            write!(
                f,
                "  Need {} from {} overs  RRR: {:.2}",
                required, self.overs_remaining, rrr
            )?;
        }
        writeln!(f)?;
        if let (Some(s), Some(n)) = (&self.striker, &self.non_striker) {
            writeln!(f, "{}*: {} ({})  {}: {} ({})", s.name, s.runs, s.balls, n.name, n.runs, n.balls)?;
        }
        if let Some(b) = &self.bowler {
            writeln!(f, "Bowling: {} {}/{} ({})", b.name, b.wickets, b.runs, b.overs)?;
        }
        if let Some(result) = &self.result {
            writeln!(f, "{}", result)?;
        }
        Ok(())
    }
}

/// One team's innings: its batting card and the opposition bowlers who
/// bowled at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamScorecard {
    pub team: String,
    pub bowling_team: String,
    pub total_runs: u32,
    pub wickets: u32,
    pub extras: u32,
    pub overs: String,
    pub batting: Vec<BatterLine>,
    pub bowling: Vec<BowlerLine>,
}

impl TeamScorecard {
    pub fn from_innings(team: &Team, opposition: &Team) -> Self {
        Self {
            team: team.name.clone(),
            bowling_team: opposition.name.clone(),
            total_runs: team.total_runs,
            wickets: team.wickets,
            extras: team.extras,
            overs: team.overs().to_string(),
            batting: team
                .players
                .iter()
                .filter(|p| p.batting_figures.balls_faced > 0)
                .map(BatterLine::from)
                .collect(),
            bowling: opposition
                .players
                .iter()
                .filter(|p| p.bowling_figures.balls_bowled > 0)
                .map(BowlerLine::from)
                .collect(),
        }
    }
}

impl fmt::Display for TeamScorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - Batting", self.team)?;
        writeln!(f, "{:<24} {:>4} {:>4} {:>3} {:>3} {:>7}", "Batsman", "R", "B", "4s", "6s", "SR")?;
        for b in &self.batting {
            let name = if b.is_out { format!("{} (out)", b.name) } else { b.name.clone() };
            writeln!(
                f,
                "{:<24} {:>4} {:>4} {:>3} {:>3} {:>7.1}",
                name, b.runs, b.balls, b.fours, b.sixes, b.strike_rate
            )?;
        }
        writeln!(
            f,
            "Extras: {}  Total: {}/{} ({} Ov)",
            self.extras, self.total_runs, self.wickets, self.overs
        )?;
        writeln!(f, "{} - Bowling", self.bowling_team)?;
        writeln!(f, "{:<24} {:>5} {:>3} {:>4} {:>3} {:>6}", "Bowler", "O", "M", "R", "W", "Econ")?;
        for b in &self.bowling {
            writeln!(
                f,
                "{:<24} {:>5} {:>3} {:>4} {:>3} {:>6.1}",
                b.name, b.overs, b.maidens, b.runs, b.wickets, b.economy
            )?;
        }
        Ok(())
    }
}

/// Both innings cards: Team A batting against Team B's bowlers, then the
/// reverse.
pub fn scorecards(state: &MatchState) -> [TeamScorecard; 2] {
    [
        TeamScorecard::from_innings(&state.team_a, &state.team_b),
        TeamScorecard::from_innings(&state.team_b, &state.team_a),
    ]
}
