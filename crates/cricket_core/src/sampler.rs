//! Delivery outcomes and the weighted random sampler.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Result of a single delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryOutcome {
    #[serde(rename = "dot")]
    Dot,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "wicket")]
    Wicket,
    #[serde(rename = "wide")]
    Wide,
    #[serde(rename = "no-ball")]
    NoBall,
}

impl DeliveryOutcome {
    /// Every outcome in sampling-table order.
    pub const ALL: [DeliveryOutcome; 9] = [
        DeliveryOutcome::Dot,
        DeliveryOutcome::One,
        DeliveryOutcome::Two,
        DeliveryOutcome::Three,
        DeliveryOutcome::Four,
        DeliveryOutcome::Six,
        DeliveryOutcome::Wicket,
        DeliveryOutcome::Wide,
        DeliveryOutcome::NoBall,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DeliveryOutcome::Dot => "dot",
            DeliveryOutcome::One => "1",
            DeliveryOutcome::Two => "2",
            DeliveryOutcome::Three => "3",
            DeliveryOutcome::Four => "4",
            DeliveryOutcome::Six => "6",
            DeliveryOutcome::Wicket => "wicket",
            DeliveryOutcome::Wide => "wide",
            DeliveryOutcome::NoBall => "no-ball",
        }
    }

    /// Runs credited to the striker off the bat.
    pub fn bat_runs(&self) -> u32 {
        match self {
            DeliveryOutcome::One => 1,
            DeliveryOutcome::Two => 2,
            DeliveryOutcome::Three => 3,
            DeliveryOutcome::Four => 4,
            DeliveryOutcome::Six => 6,
            DeliveryOutcome::Dot
            | DeliveryOutcome::Wicket
            | DeliveryOutcome::Wide
            | DeliveryOutcome::NoBall => 0,
        }
    }

    /// Runs credited to the team as extras.
    pub fn extra_runs(&self) -> u32 {
        if self.is_legal() {
            0
        } else {
            1
        }
    }

    /// Wides and no-balls do not count toward the over.
    pub fn is_legal(&self) -> bool {
        !matches!(self, DeliveryOutcome::Wide | DeliveryOutcome::NoBall)
    }

    /// Odd runs send the batsmen to opposite ends.
    pub fn rotates_strike(&self) -> bool {
        matches!(self, DeliveryOutcome::One | DeliveryOutcome::Three)
    }

    /// Short commentary line for the delivery.
    pub fn describe(&self) -> &'static str {
        match self {
            DeliveryOutcome::Dot => "Dot ball!",
            DeliveryOutcome::One => "1 run scored",
            DeliveryOutcome::Two => "2 runs scored",
            DeliveryOutcome::Three => "3 runs scored",
            DeliveryOutcome::Four => "FOUR! Boundary scored",
            DeliveryOutcome::Six => "SIX! Maximum scored",
            DeliveryOutcome::Wicket => "OUT! Wicket taken",
            DeliveryOutcome::Wide => "Wide ball! +1 extra run",
            DeliveryOutcome::NoBall => "No ball! +1 extra run",
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown delivery outcome: '{0}'")]
pub struct ParseOutcomeError(pub String);

impl FromStr for DeliveryOutcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DeliveryOutcome::ALL
            .iter()
            .copied()
            .find(|o| o.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOutcomeError(s.to_string()))
    }
}

/// Relative weights per outcome, walked in [`DeliveryOutcome::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeWeights {
    weights: [u32; 9],
}

impl Default for OutcomeWeights {
    fn default() -> Self {
        // dot, 1, 2, 3, 4, 6, wicket, wide, no-ball
        Self { weights: [30, 20, 10, 5, 10, 5, 10, 5, 5] }
    }
}

impl OutcomeWeights {
    pub fn total(&self) -> u32 {
        self.weights.iter().sum()
    }

    pub fn weight(&self, outcome: DeliveryOutcome) -> u32 {
        DeliveryOutcome::ALL
            .iter()
            .position(|o| *o == outcome)
            .map(|i| self.weights[i])
            .unwrap_or(0)
    }

    /// Map a uniform draw in `[0, 1)` onto an outcome.
    ///
    /// Falls back to `Dot` if the draw escapes every bucket, which only a
    /// zero total weight can cause.
    pub fn pick(&self, unit: f64) -> DeliveryOutcome {
        let draw = unit * self.total() as f64;
        let mut cumulative = 0.0;
        for (outcome, weight) in DeliveryOutcome::ALL.iter().zip(self.weights) {
            cumulative += weight as f64;
            if draw < cumulative {
                return *outcome;
            }
        }
        DeliveryOutcome::Dot
    }

    pub fn sample(&self, rng: &mut impl Rng) -> DeliveryOutcome {
        self.pick(rng.gen::<f64>())
    }
}

/// Draw one outcome from the standard weight table.
pub fn sample_outcome(rng: &mut impl Rng) -> DeliveryOutcome {
    OutcomeWeights::default().sample(rng)
}
