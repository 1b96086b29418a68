use super::User;
use chrono::{DateTime, Utc};

/// A message read from (or posted to) a text channel
#[derive(Debug, Clone)]
pub struct ChannelMessage {
    pub author: Option<User>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChannelMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            author: None,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_author(mut self, user: User) -> Self {
        self.author = Some(user);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn is_from_bot(&self) -> bool {
        self.author.as_ref().map(|a| a.is_bot).unwrap_or(false)
    }

    pub fn is_from(&self, user_id: &str) -> bool {
        self.author.as_ref().map(|a| a.id == user_id).unwrap_or(false)
    }
}
