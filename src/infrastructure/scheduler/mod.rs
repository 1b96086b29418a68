//! Fixed-rate polling loop

use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::application::errors::BotError;
use crate::application::services::{AnnounceService, Outcome, TrackerService};

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Run one check per tick until `shutdown` resolves.
    /// A tick that overruns the interval delays the next one instead of
    /// stacking checks, and failed ticks never stop the loop. Shutdown
    /// abandons a check that is still in flight.
    pub async fn run<F>(&self, tracker: &TrackerService, announcer: &mut AnnounceService, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        let mut ticks = 0u64;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down after {} checks", ticks);
                    return ticks;
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    tokio::select! {
                        _ = &mut shutdown => {
                            tracing::info!("Shutting down during check {}", ticks);
                            return ticks;
                        }
                        result = check_once(tracker, announcer) => match result {
                            Ok(Outcome::Announced(message_id)) => tracing::debug!("Announced as message {}", message_id),
                            Ok(Outcome::Unchanged) => {}
                            Err(e) => tracing::error!("Error processing leaderboard: {}", e),
                        }
                    }
                }
            }
        }
    }
}

/// Locate the player and announce any change
pub async fn check_once(tracker: &TrackerService, announcer: &mut AnnounceService) -> Result<Outcome, BotError> {
    let standing = tracker.locate().await?;
    announcer.process(standing).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::LeaderboardParser;
    use crate::application::services::ScanConfig;
    use crate::domain::entities::ChannelMessage;
    use crate::domain::traits::{Bot, BotInfo, LeaderboardSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Player climbs one rank per fetch; every other fetch fails
    struct ClimbingSource {
        calls: AtomicU32,
    }

    #[async_trait]
    impl LeaderboardSource for ClimbingSource {
        async fn fetch_page(&self, _start: u32) -> Result<String, BotError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n % 2 == 1 {
                return Err(BotError::Network("HTTP error: 502".to_string()));
            }
            Ok(format!(
                r#"<div class="lbentry"><div class="rR">#{}</div><a class="playerName" href="p">Cone</a><div class="score">100</div></div>"#,
                50 - n
            ))
        }
    }

    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn start(&self) -> Result<(), BotError> {
            Ok(())
        }

        async fn send_message(&self, _channel_id: &str, text: &str) -> Result<String, BotError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok("id".to_string())
        }

        async fn recent_messages(&self, _channel_id: &str, _limit: u8) -> Result<Vec<ChannelMessage>, BotError> {
            Ok(Vec::new())
        }

        fn bot_info(&self) -> BotInfo {
            BotInfo { id: None, username: "rec".to_string() }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_the_loop() {
        let source = Arc::new(ClimbingSource { calls: AtomicU32::new(0) });
        let tracker = TrackerService::new(source.clone(), LeaderboardParser::new("Cone").unwrap(), ScanConfig::default());
        let bot = Arc::new(RecordingBot::default());
        let mut announcer = AnnounceService::new(bot.clone(), "chan", "Cone");

        let scheduler = Scheduler::new(Duration::from_secs(15));
        // Ticks at 0s, 15s, 30s, 45s
        let ticks = scheduler
            .run(&tracker, &mut announcer, tokio::time::sleep(Duration::from_secs(50)))
            .await;

        assert_eq!(ticks, 4);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);

        let sent = bot.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("magically appeared"));
        assert!(sent[1].contains("Climbing 2 spots"));
    }

    /// Every page takes 30 seconds to arrive
    struct SlowSource;

    #[async_trait]
    impl LeaderboardSource for SlowSource {
        async fn fetch_page(&self, _start: u32) -> Result<String, BotError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_running_check() {
        let tracker = TrackerService::new(Arc::new(SlowSource), LeaderboardParser::new("Cone").unwrap(), ScanConfig::default());
        let bot = Arc::new(RecordingBot::default());
        let mut announcer = AnnounceService::new(bot.clone(), "chan", "Cone");

        let scheduler = Scheduler::new(Duration::from_secs(15));
        let started = tokio::time::Instant::now();
        let ticks = scheduler
            .run(&tracker, &mut announcer, tokio::time::sleep(Duration::from_secs(1)))
            .await;

        assert_eq!(ticks, 1);
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(bot.sent.lock().unwrap().is_empty());
    }
}
