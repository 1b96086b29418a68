//! Messaging - leaderboard parsing and announcement formatting

pub mod parser;
pub mod formatter;

pub use parser::{parse_announcement, LeaderboardParser};
pub use formatter::format_announcement;
