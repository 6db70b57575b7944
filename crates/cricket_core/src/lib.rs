//! # cricket_core - Limited-Overs Cricket Match Engine
//!
//! Simulates a match between two fixed rosters one delivery at a time.
//!
//! ## Features
//! - Pure delivery transition (`process_delivery`) over immutable snapshots
//! - Eligibility rules for incoming batsmen and the next over's bowler
//! - Seedable weighted outcome sampler (same seed = same match)
//! - Session driver with step tracking and validated player selection
//! - JSON API for whole-match simulation

pub mod api;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod models;
pub mod roster;
pub mod sampler;
pub mod scoreboard;
pub mod session;

pub use api::{simulate_match, simulate_match_json, MatchRequest, MatchResponse};
pub use config::{ConfigError, MatchConfig};
pub use eligibility::{available_batsmen, available_bowlers, can_bowl};
pub use engine::{process_delivery, process_delivery_with_event, DeliveryEvent};
pub use error::{CoreError, Result};
pub use models::{
    Innings, MatchOutcome, MatchState, Overs, Player, PlayerId, RoleSlot, Team, TeamSide,
};
pub use roster::{build_team, generate_team, initialize_teams};
pub use sampler::{sample_outcome, DeliveryOutcome, OutcomeWeights};
pub use scoreboard::{Scoreboard, TeamScorecard};
pub use session::{MatchSession, MatchStep, Role, SessionAction, SessionError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
