//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Locating the player and announcing changes
//! - Errors: Domain-specific errors
//! - Messaging: Leaderboard parsing and announcement formatting

pub mod errors;
pub mod services;
pub mod messaging;
