//! Overs in cricket notation.
//!
//! `4.3` means four completed overs and three legal balls into the fifth.
//! The fractional digit is a ball count (0..=5), not a decimal fraction, so
//! the value is `floor(balls / 6) + (balls % 6) / 10`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BALLS_PER_OVER: u32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overs {
    balls: u32,
}

impl Overs {
    pub const ZERO: Overs = Overs { balls: 0 };

    pub fn from_balls(balls: u32) -> Self {
        Self { balls }
    }

    /// Whole overs, e.g. `Overs::whole(20)` for a T20 innings.
    pub fn whole(overs: u32) -> Self {
        Self { balls: overs.saturating_mul(BALLS_PER_OVER) }
    }

    pub fn balls(&self) -> u32 {
        self.balls
    }

    pub fn completed(&self) -> u32 {
        self.balls / BALLS_PER_OVER
    }

    pub fn balls_in_over(&self) -> u32 {
        self.balls % BALLS_PER_OVER
    }

    /// Mixed-radix numeric value (`7` balls -> `1.1`).
    pub fn value(&self) -> f64 {
        self.completed() as f64 + self.balls_in_over() as f64 / 10.0
    }

    /// True once at least `overs` whole overs have been bowled.
    ///
    /// Equivalent to `value() >= overs` without going through floats.
    pub fn reached(&self, overs: u32) -> bool {
        self.balls >= overs.saturating_mul(BALLS_PER_OVER)
    }

    /// True on an over boundary after at least one legal ball.
    pub fn is_over_boundary(&self) -> bool {
        self.balls > 0 && self.balls_in_over() == 0
    }

    pub fn saturating_sub(self, other: Overs) -> Overs {
        Overs { balls: self.balls.saturating_sub(other.balls) }
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.balls_in_over() {
            0 => write!(f, "{}", self.completed()),
            b => write!(f, "{}.{}", self.completed(), b),
        }
    }
}
