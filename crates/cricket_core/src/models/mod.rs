pub mod match_state;
pub mod overs;
pub mod player;
pub mod team;

pub use match_state::{Innings, MatchOutcome, MatchState, RoleSlot, ALL_OUT_WICKETS};
pub use overs::{Overs, BALLS_PER_OVER};
pub use player::{
    BattingAttributes, BattingFigures, BowlingAttributes, BowlingFigures, Player, PlayerId,
    DEFAULT_ATTRIBUTE,
};
pub use team::{Team, TeamSide};
