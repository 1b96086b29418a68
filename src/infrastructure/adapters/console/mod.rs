//! Console adapter for development/testing

use async_trait::async_trait;
use crate::domain::entities::ChannelMessage;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: Some("console".to_string()),
                username: "console".to_string(),
            },
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    async fn recent_messages(&self, _channel_id: &str, _limit: u8) -> Result<Vec<ChannelMessage>, BotError> {
        Ok(Vec::new())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
