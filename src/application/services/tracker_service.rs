use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::LeaderboardParser;
use crate::domain::entities::Standing;
use crate::domain::traits::LeaderboardSource;

/// Which pages a scan walks through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub first_start: u32,
    pub page_step: u32,
    pub max_start: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            first_start: 1,
            page_step: 15,
            max_start: 100,
        }
    }
}

/// Locates the tracked player by walking leaderboard pages
pub struct TrackerService {
    source: Arc<dyn LeaderboardSource>,
    parser: LeaderboardParser,
    scan: ScanConfig,
}

impl TrackerService {
    pub fn new(source: Arc<dyn LeaderboardSource>, parser: LeaderboardParser, scan: ScanConfig) -> Self {
        Self { source, parser, scan }
    }

    pub fn player(&self) -> &str {
        self.parser.player()
    }

    /// Fetch pages from `first_start`, stepping by `page_step` while the start
    /// rank stays below `max_start`, until the player shows up.
    pub async fn locate(&self) -> Result<Standing, BotError> {
        let mut start = self.scan.first_start;

        loop {
            let html = self.source.fetch_page(start).await?;

            if let Some(standing) = self.parser.find(&html) {
                tracing::info!("Match found at index: {}", start);
                return Ok(standing);
            }

            start = start.saturating_add(self.scan.page_step);
            tracing::info!("No match found, increasing index to {}", start);

            if start >= self.scan.max_start {
                return Err(BotError::NotFound(
                    "No match found after multiple attempts".to_string(),
                ));
            }
        }
    }
}
