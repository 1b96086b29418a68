use async_trait::async_trait;
use crate::domain::entities::ChannelMessage;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Connect and verify credentials
    async fn start(&self) -> Result<(), BotError>;

    /// Send a message to a channel, returning the new message id
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError>;

    /// Most recent messages of a channel, newest first
    async fn recent_messages(&self, channel_id: &str, limit: u8) -> Result<Vec<ChannelMessage>, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: Option<String>,
    pub username: String,
}
