//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Platform integrations (Discord, console)
//! - Webcrawler: Leaderboard page fetching
//! - Scheduler: The polling loop

pub mod config;
pub mod adapters;
pub mod webcrawler;
pub mod scheduler;
