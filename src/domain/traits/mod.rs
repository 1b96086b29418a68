//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod source;

pub use bot::{Bot, BotInfo};
pub use source::LeaderboardSource;
