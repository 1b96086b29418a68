//! Leaderboard parser - Extracts standings from leaderboard HTML and from
//! announcements the bot posted earlier

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::ConfigError;
use crate::domain::entities::Standing;

const ENTRY_MARKER: &str = r#"<div class="lbentry">"#;

static ANNOUNCEMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Ranking: (\d+) \| Points: ([\d,]+)").expect("announcement pattern is valid")
});

/// Finds one player's entry on a leaderboard page
#[derive(Debug, Clone)]
pub struct LeaderboardParser {
    player: String,
    entry_pattern: Regex,
}

impl LeaderboardParser {
    pub fn new(player: impl Into<String>) -> Result<Self, ConfigError> {
        let player = player.into();
        if player.trim().is_empty() {
            return Err(ConfigError::MissingField("leaderboard.player".to_string()));
        }

        let pattern = format!(
            r#"(?s)<div class="rR">#(\d+)</div>.*?<a class="playerName" href="[^"]*">{}</a>.*?<div class="score">([\d,]+)"#,
            regex_lite::escape(&player)
        );
        let entry_pattern = Regex::new(&pattern)
            .map_err(|e| ConfigError::InvalidValue(format!("player pattern: {}", e)))?;

        Ok(Self { player, entry_pattern })
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    /// Standing of the player on this page, if listed.
    /// Each entry is matched on its own so rank and score never leak
    /// across neighbouring entries.
    pub fn find(&self, html: &str) -> Option<Standing> {
        html.split(ENTRY_MARKER).skip(1).find_map(|entry| {
            let caps = self.entry_pattern.captures(entry)?;
            match Standing::parse(&caps[1], &caps[2]) {
                Ok(standing) => Some(standing),
                Err(e) => {
                    tracing::warn!("Skipping malformed entry for {}: {}", self.player, e);
                    None
                }
            }
        })
    }
}

/// Standing announced in a previously posted message, if any
pub fn parse_announcement(text: &str) -> Option<Standing> {
    let caps = ANNOUNCEMENT_PATTERN.captures(text)?;
    Standing::parse(&caps[1], &caps[2]).ok()
}
