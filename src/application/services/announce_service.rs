use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::{format_announcement, parse_announcement};
use crate::domain::entities::{ChannelMessage, Standing, StandingChange};
use crate::domain::traits::Bot;

/// Result of handling a freshly located standing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Announced(String),
}

/// Keeps the last announced standing and posts updates to the channel
pub struct AnnounceService {
    bot: Arc<dyn Bot>,
    channel_id: String,
    player: String,
    last: Option<Standing>,
}

impl AnnounceService {
    pub fn new(bot: Arc<dyn Bot>, channel_id: impl Into<String>, player: impl Into<String>) -> Self {
        Self {
            bot,
            channel_id: channel_id.into(),
            player: player.into(),
            last: None,
        }
    }

    #[cfg(test)]
    pub fn with_last(mut self, last: Option<Standing>) -> Self {
        self.last = last;
        self
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<Standing> {
        self.last
    }

    /// Seed the last standing from the newest announcement this bot posted.
    /// Failures only mean the next standing is treated as a first sighting.
    pub async fn restore(&mut self, history_limit: u8) -> Option<Standing> {
        let messages = match self.bot.recent_messages(&self.channel_id, history_limit).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Failed to read channel history: {}", e);
                return None;
            }
        };

        let own_id = self.bot.bot_info().id;
        let newest = messages.iter().find(|m| is_own_message(m, own_id.as_deref()));

        self.last = newest.and_then(|m| parse_announcement(&m.content));
        match (self.last, newest) {
            (Some(standing), Some(m)) => {
                tracing::info!("Restored last standing: {} (posted {})", standing, m.timestamp)
            }
            _ => tracing::info!("No previous announcement found in channel {}", self.channel_id),
        }
        self.last
    }

    /// The announcement `process` would post for `current`, without sending it
    pub fn preview(&self, current: Standing) -> Option<String> {
        format_announcement(&self.player, &StandingChange::new(self.last, current))
    }

    /// Announce `current` if it differs from the last standing
    pub async fn process(&mut self, current: Standing) -> Result<Outcome, BotError> {
        let change = StandingChange::new(self.last, current);

        let Some(message) = format_announcement(&self.player, &change) else {
            tracing::info!("No change in leaderboard, skipping message");
            return Ok(Outcome::Unchanged);
        };

        tracing::info!("Sending message: {}", message);
        let message_id = self.bot.send_message(&self.channel_id, &message).await?;
        self.last = Some(current);

        Ok(Outcome::Announced(message_id))
    }
}

fn is_own_message(message: &ChannelMessage, own_id: Option<&str>) -> bool {
    match own_id {
        Some(id) => message.is_from(id),
        None => message.is_from_bot(),
    }
}
