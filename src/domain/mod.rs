//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (Standing, ChannelMessage, User)
//! - Traits: Abstractions for infrastructure (Bot, LeaderboardSource)

pub mod entities;
pub mod traits;
