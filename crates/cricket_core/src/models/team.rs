use super::{Overs, Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Which of the two fixed rosters a team is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn other(self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    /// Roster order. Stable, used for display only.
    pub players: Vec<Player>,
    #[serde(default)]
    pub total_runs: u32,
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub extras: u32,
    /// Legal deliveries faced this innings. Sole driver of `overs()`.
    #[serde(default)]
    pub balls: u32,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>) -> Self {
        Self {
            name: name.into(),
            players,
            total_runs: 0,
            wickets: 0,
            extras: 0,
            balls: 0,
        }
    }

    pub fn overs(&self) -> Overs {
        Overs::from_balls(self.balls)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Zero the innings aggregates and every player's batting counters.
    pub(crate) fn reset_for_batting(&mut self) {
        self.total_runs = 0;
        self.wickets = 0;
        self.extras = 0;
        self.balls = 0;
        for player in &mut self.players {
            player.reset_batting();
        }
    }

    /// Zero every player's bowling counters.
    pub(crate) fn reset_for_bowling(&mut self) {
        for player in &mut self.players {
            player.reset_bowling();
        }
    }

    /// "145/6" style score line.
    pub fn score_line(&self) -> String {
        format!("{}/{}", self.total_runs, self.wickets)
    }
}
