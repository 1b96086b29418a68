use async_trait::async_trait;
use crate::application::errors::BotError;

/// Where leaderboard pages come from
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Raw HTML of the leaderboard page starting at rank `start`
    async fn fetch_page(&self, start: u32) -> Result<String, BotError>;
}
