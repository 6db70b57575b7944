use super::Overs;
use serde::{Deserialize, Serialize};

/// Roster-unique player identifier (unique within its team only).
pub type PlayerId = u32;

/// Attribute fallback used for missing or falsy roster cells.
pub const DEFAULT_ATTRIBUTE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingAttributes {
    pub power: u8,
    pub defense: u8,
    pub timing: u8,
    pub running: u8,
}

impl Default for BattingAttributes {
    fn default() -> Self {
        Self {
            power: DEFAULT_ATTRIBUTE,
            defense: DEFAULT_ATTRIBUTE,
            timing: DEFAULT_ATTRIBUTE,
            running: DEFAULT_ATTRIBUTE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingAttributes {
    pub accuracy: u8,
    pub intelligence: u8,
    pub variation: u8,
    pub line_and_length: u8,
}

impl Default for BowlingAttributes {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ATTRIBUTE,
            intelligence: DEFAULT_ATTRIBUTE,
            variation: DEFAULT_ATTRIBUTE,
            line_and_length: DEFAULT_ATTRIBUTE,
        }
    }
}

/// Per-innings batting counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingFigures {
    pub is_out: bool,
    pub runs_scored: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
}

/// Per-innings bowling counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BowlingFigures {
    pub wickets_taken: u32,
    pub runs_conceded: u32,
    pub balls_bowled: u32,
    pub maidens: u32,
    /// Runs conceded in the over in progress; a maiden is an over that
    /// closes with this still at zero.
    #[serde(default)]
    pub over_runs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub batting: BattingAttributes,
    pub bowling: BowlingAttributes,
    #[serde(default)]
    pub batting_figures: BattingFigures,
    #[serde(default)]
    pub bowling_figures: BowlingFigures,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<String>,
        batting: BattingAttributes,
        bowling: BowlingAttributes,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            batting,
            bowling,
            batting_figures: BattingFigures::default(),
            bowling_figures: BowlingFigures::default(),
        }
    }

    pub fn is_out(&self) -> bool {
        self.batting_figures.is_out
    }

    /// Overs bowled in the mixed-radix display format.
    pub fn overs_bowled(&self) -> Overs {
        Overs::from_balls(self.bowling_figures.balls_bowled)
    }

    /// Runs per hundred balls faced. Zero before the first ball.
    pub fn strike_rate(&self) -> f64 {
        let balls = self.batting_figures.balls_faced;
        if balls == 0 {
            return 0.0;
        }
        self.batting_figures.runs_scored as f64 * 100.0 / balls as f64
    }

    /// Runs conceded per six legal balls. Zero before the first ball.
    pub fn economy(&self) -> f64 {
        let balls = self.bowling_figures.balls_bowled;
        if balls == 0 {
            return 0.0;
        }
        self.bowling_figures.runs_conceded as f64 * 6.0 / balls as f64
    }

    pub(crate) fn reset_batting(&mut self) {
        self.batting_figures = BattingFigures::default();
    }

    pub(crate) fn reset_bowling(&mut self) {
        self.bowling_figures = BowlingFigures::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(7, "Test", BattingAttributes::default(), BowlingAttributes::default())
    }

    #[test]
    fn test_new_player_has_zeroed_figures() {
        let p = player();
        assert!(!p.is_out());
        assert_eq!(p.batting_figures, BattingFigures::default());
        assert_eq!(p.bowling_figures, BowlingFigures::default());
        assert_eq!(p.overs_bowled().value(), 0.0);
    }

    #[test]
    fn test_rates_guard_zero_balls() {
        let p = player();
        assert_eq!(p.strike_rate(), 0.0);
        assert_eq!(p.economy(), 0.0);
    }

    #[test]
    fn test_rates() {
        let mut p = player();
        p.batting_figures.runs_scored = 30;
        p.batting_figures.balls_faced = 20;
        p.bowling_figures.runs_conceded = 21;
        p.bowling_figures.balls_bowled = 18;
        assert!((p.strike_rate() - 150.0).abs() < 1e-9);
        assert!((p.economy() - 7.0).abs() < 1e-9);
        assert_eq!(p.overs_bowled().to_string(), "3");
    }
}
