//! Discord adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;

use crate::application::errors::BotError;
use crate::domain::entities::{ChannelMessage, User};
use crate::domain::traits::{Bot, BotInfo};

/// Discord REST API base URL
const API_BASE: &str = "https://discord.com/api/v10";

/// Longest message Discord accepts
const MAX_CONTENT_CHARS: usize = 2000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiMessage {
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<ApiUser>,
    pub timestamp: DateTime<Utc>,
}

impl From<ApiUser> for User {
    fn from(u: ApiUser) -> Self {
        let user = User::new(u.id).with_username(u.username);
        if u.bot {
            user.as_bot()
        } else {
            user
        }
    }
}

impl From<ApiMessage> for ChannelMessage {
    fn from(m: ApiMessage) -> Self {
        let msg = ChannelMessage::new(m.content).with_timestamp(m.timestamp);
        match m.author {
            Some(author) => msg.with_author(author.into()),
            None => msg,
        }
    }
}

/// Discord bot adapter
pub struct DiscordAdapter {
    token: String,
    client: Client,
    api_base: String,
    info: RwLock<BotInfo>,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token: token.into(),
            client,
            api_base: API_BASE.to_string(),
            info: RwLock::new(BotInfo {
                id: None,
                username: "steam-ladder-bot".to_string(),
            }),
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Get the API URL for a route
    fn api_url(&self, route: &str) -> String {
        format!("{}/{}", self.api_base, route.trim_start_matches('/'))
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    /// Fetch the bot's own user from Discord
    pub async fn fetch_bot_info(&self) -> Result<BotInfo, BotError> {
        let response = self
            .client
            .get(self.api_url("users/@me"))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let me: ApiUser = decode(response).await?;
        let info = BotInfo {
            id: Some(me.id),
            username: me.username,
        };

        if let Ok(mut guard) = self.info.write() {
            *guard = info.clone();
        }
        Ok(info)
    }
}

#[async_trait]
impl Bot for DiscordAdapter {
    async fn start(&self) -> Result<(), BotError> {
        let info = self.fetch_bot_info().await?;
        tracing::info!("Logged in to Discord as {}", info.username);
        Ok(())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct CreateMessageRequest<'a> {
            content: &'a str,
        }

        let content = truncate(text, MAX_CONTENT_CHARS);
        if content.len() < text.len() {
            tracing::warn!("Message truncated to {} characters", MAX_CONTENT_CHARS);
        }

        let response = self
            .client
            .post(self.api_url(&format!("channels/{}/messages", channel_id)))
            .header("Authorization", self.auth_header())
            .json(&CreateMessageRequest { content })
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let message: ApiMessage = decode(response).await?;
        tracing::debug!("Sent message {} to {}", message.id, channel_id);
        Ok(message.id)
    }

    async fn recent_messages(&self, channel_id: &str, limit: u8) -> Result<Vec<ChannelMessage>, BotError> {
        let limit = limit.clamp(1, 100);
        let response = self
            .client
            .get(self.api_url(&format!("channels/{}/messages", channel_id)))
            .header("Authorization", self.auth_header())
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let messages: Vec<ApiMessage> = decode(response).await?;
        Ok(messages.into_iter().map(ChannelMessage::from).collect())
    }

    fn bot_info(&self) -> BotInfo {
        match self.info.read() {
            Ok(info) => info.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Decode a successful response body or map the failure
async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, BotError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }

    response
        .json()
        .await
        .map_err(|e| BotError::Parse(e.to_string()))
}

fn status_error(status: StatusCode, body: &str) -> BotError {
    #[derive(Deserialize)]
    struct RateLimitBody {
        retry_after: f64,
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = serde_json::from_str::<RateLimitBody>(body)
                .ok()
                .filter(|b| b.retry_after.is_finite() && b.retry_after >= 0.0)
                .map(|b| Duration::from_secs_f64(b.retry_after))
                .unwrap_or(Duration::from_secs(1));
            BotError::RateLimited { retry_after }
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            BotError::Auth(format!("Discord API error: {} {}", status, body))
        }
        _ => BotError::Network(format!("Discord API error: {} {}", status, body)),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
