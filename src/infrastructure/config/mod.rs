//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::application::services::ScanConfig;

/// Bot configuration. Every section and key may be omitted and falls
/// back to its default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub discord: DiscordConfig,
    pub leaderboard: LeaderboardConfig,
    pub crawler: CrawlerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiscordConfig {
    pub token: Option<String>,
    pub channel_id: Option<String>,
    pub history_limit: u8,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LeaderboardConfig {
    pub player: String,
    /// Page URL up to and including the start-rank parameter
    pub url: String,
    pub poll_interval_secs: u64,
    pub first_start: u32,
    pub page_step: u32,
    pub max_start: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub min_interval_ms: u64,
    pub max_per_minute: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "steam-ladder-bot".to_string(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            channel_id: None,
            history_limit: 50,
            timeout_secs: 30,
        }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            player: "Cone".to_string(),
            url: "https://steamcommunity.com/stats/2217000/leaderboards/14800950?sr=".to_string(),
            poll_interval_secs: 15,
            first_start: 1,
            page_step: 15,
            max_start: 100,
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 30,
            min_interval_ms: 500,
            max_per_minute: 60,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("DISCORD_TOKEN").filter(|t| !t.is_empty()) {
            self.discord.token = Some(token);
        }

        if let Some(channel) = var("DISCORD_CHANNEL_ID").filter(|c| !c.is_empty()) {
            self.discord.channel_id = Some(channel);
        }

        if let Some(player) = var("LADDER_PLAYER").filter(|p| !p.is_empty()) {
            self.leaderboard.player = player;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaderboard.player.trim().is_empty() {
            return Err(ConfigError::MissingField("leaderboard.player".to_string()));
        }
        if self.leaderboard.url.is_empty() {
            return Err(ConfigError::MissingField("leaderboard.url".to_string()));
        }
        if self.leaderboard.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue("leaderboard.poll-interval-secs must be > 0".to_string()));
        }
        if self.discord.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("discord.timeout-secs must be > 0".to_string()));
        }
        if self.leaderboard.page_step == 0 {
            return Err(ConfigError::InvalidValue("leaderboard.page-step must be > 0".to_string()));
        }
        if !(1..=100).contains(&self.discord.history_limit) {
            return Err(ConfigError::InvalidValue("discord.history-limit must be 1..=100".to_string()));
        }
        if self.discord.token.is_some() && self.discord.channel_id.is_none() {
            return Err(ConfigError::MissingField("discord.channel-id".to_string()));
        }
        if let Some(channel) = &self.discord.channel_id {
            if channel.parse::<u64>().is_err() {
                return Err(ConfigError::InvalidValue(format!("discord.channel-id {:?} is not a snowflake", channel)));
            }
        }
        Ok(())
    }

    pub fn scan(&self) -> ScanConfig {
        ScanConfig {
            first_start: self.leaderboard.first_start,
            page_step: self.leaderboard.page_step,
            max_start: self.leaderboard.max_start,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.leaderboard.poll_interval_secs)
    }

    pub fn discord_timeout(&self) -> Duration {
        Duration::from_secs(self.discord.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scan(), ScanConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(15));
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("poll-interval-secs: 15"));
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.leaderboard.player, "Cone");
    }

    #[test]
    fn test_scan_fields_are_optional() {
        let yaml = r#"
bot:
  name: ladder
discord:
  token: abc
  channel-id: "123456789012345678"
leaderboard:
  player: Someone
  url: "https://example.com/lb?sr="
  poll-interval-secs: 60
crawler:
  user-agent: test
  timeout-secs: 5
  min-interval-ms: 0
  max-per-minute: 10
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.scan(), ScanConfig::default());
        assert_eq!(config.discord.history_limit, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let yaml = r#"
discord:
  token: abc
  channel-id: "123456789012345678"
leaderboard:
  player: Someone
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.discord.token.as_deref(), Some("abc"));
        assert_eq!(config.discord.channel_id.as_deref(), Some("123456789012345678"));
        assert_eq!(config.discord.timeout_secs, 30);
        assert_eq!(config.leaderboard.player, "Someone");
        assert_eq!(config.poll_interval(), Duration::from_secs(15));
        assert_eq!(config.crawler.timeout_secs, 30);
        assert_eq!(config.bot.name, "steam-ladder-bot");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars = HashMap::from([
            ("DISCORD_TOKEN", "tok"),
            ("DISCORD_CHANNEL_ID", "42"),
            ("LADDER_PLAYER", ""),
        ]);
        let mut config = Config::default();
        config.apply_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.discord.token.as_deref(), Some("tok"));
        assert_eq!(config.discord.channel_id.as_deref(), Some("42"));
        assert_eq!(config.leaderboard.player, "Cone");
    }

    #[test]
    fn test_token_requires_channel() {
        let mut config = Config::default();
        config.discord.token = Some("tok".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));

        config.discord.channel_id = Some("general".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut config = Config::default();
        config.leaderboard.page_step = 0;
        assert!(config.validate().is_err());
    }
}
