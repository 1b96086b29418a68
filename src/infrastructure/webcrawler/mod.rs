//! Web Crawler Module
//!
//! Leaderboard page fetching with per-domain rate limiting

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::application::errors::BotError;
use crate::domain::traits::LeaderboardSource;
use crate::infrastructure::config::CrawlerConfig;

/// Rate limiter for domains
pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    min_interval: Duration,
    max_per_minute: u32,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64, max_per_minute: u32) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            min_interval: Duration::from_millis(min_interval_ms),
            max_per_minute: max_per_minute.max(1),
        }
    }

    /// Wait if necessary before making a request to this domain
    pub async fn wait_for(&self, domain: &str) {
        loop {
            let wait = {
                let mut requests = self.requests.lock().await;
                let now = Instant::now();
                let window = Duration::from_secs(60);

                let insts = requests.entry(domain.to_string()).or_default();
                insts.retain(|i| now.duration_since(*i) < window);

                let spacing = insts
                    .last()
                    .map(|last| self.min_interval.saturating_sub(now.duration_since(*last)))
                    .unwrap_or_default();

                let quota = if insts.len() >= self.max_per_minute as usize {
                    // Wait until the oldest request leaves the window
                    insts
                        .first()
                        .map(|oldest| window.saturating_sub(now.duration_since(*oldest)))
                        .unwrap_or_default()
                } else {
                    Duration::ZERO
                };

                let wait = spacing.max(quota);
                if wait.is_zero() {
                    insts.push(now);
                }
                wait
            };

            if wait.is_zero() {
                break;
            }
            tracing::debug!("Rate limiting {} for {:?}", domain, wait);
            tokio::time::sleep(wait).await;
        }
    }
}

/// Fetches leaderboard pages over HTTP
pub struct WebCrawler {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl WebCrawler {
    pub fn new(base_url: impl Into<String>, config: &CrawlerConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BotError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.min_interval_ms, config.max_per_minute),
            base_url: base_url.into(),
        })
    }

    pub fn page_url(&self, start: u32) -> String {
        format!("{}{}", self.base_url, start)
    }

    /// Fetch a URL with rate limiting
    pub async fn fetch(&self, url: &str) -> Result<String, BotError> {
        let domain = extract_domain(url)?;

        self.rate_limiter.wait_for(&domain).await;

        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()
            .await
            .map_err(|e| BotError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("HTTP error: {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| BotError::Network(format!("Failed to read body: {}", e)))
    }
}

#[async_trait]
impl LeaderboardSource for WebCrawler {
    async fn fetch_page(&self, start: u32) -> Result<String, BotError> {
        let url = self.page_url(start);
        tracing::debug!("Fetching {}", url);
        self.fetch(&url).await
    }
}

/// Extract domain from URL
fn extract_domain(url: &str) -> Result<String, BotError> {
    url.split('/')
        .nth(2)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| BotError::Parse(format!("Invalid URL: {}", url)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://steamcommunity.com/stats/1/leaderboards/2?sr=1").unwrap(), "steamcommunity.com");
        assert_eq!(extract_domain("http://news.example.org/path").unwrap(), "news.example.org");
        assert!(extract_domain("not a url").is_err());
    }

    #[test]
    fn test_page_url_appends_start() {
        let crawler = WebCrawler::new("https://example.com/lb?sr=", &crate::infrastructure::config::Config::default().crawler).unwrap();
        assert_eq!(crawler.page_url(16), "https://example.com/lb?sr=16");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spaces_requests() {
        let limiter = RateLimiter::new(1000, 60);
        let started = Instant::now();
        limiter.wait_for("example.com").await;
        limiter.wait_for("example.com").await;
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_per_minute_quota() {
        let limiter = RateLimiter::new(0, 2);
        let started = Instant::now();
        for _ in 0..3 {
            limiter.wait_for("example.com").await;
        }
        assert!(started.elapsed() >= Duration::from_secs(60));

        // Other domains are not affected
        let other = Instant::now();
        limiter.wait_for("other.com").await;
        assert_eq!(other.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_live_leaderboard() {
        let config = crate::infrastructure::config::Config::default();
        let crawler = WebCrawler::new(config.leaderboard.url.clone(), &config.crawler).unwrap();
        let html = crawler.fetch_page(1).await.expect("fetch failed");
        assert!(html.contains("lbentry"));
    }
}
