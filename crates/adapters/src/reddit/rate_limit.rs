//! Outbound rate limiting for platform calls

use reddit_research_domain::Sleeper;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Enforces a minimum delay between outgoing platform calls. One shared
/// last-call timestamp gates every endpoint.
pub struct MinIntervalLimiter {
    min_interval: Duration,
    sleeper: Arc<dyn Sleeper>,
    last_call: Mutex<Option<Instant>>,
}

impl MinIntervalLimiter {
    pub fn new(min_interval: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            min_interval,
            sleeper,
            last_call: Mutex::new(None),
        }
    }

    /// Block until at least `min_interval` has passed since the previous
    /// call, then claim the slot. The lock is held across the sleep so
    /// concurrent callers queue behind the shared timestamp.
    pub async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last_call = self.last_call.lock().await;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                tracing::debug!(?remaining, "Rate limit gate, waiting");
                self.sleeper.sleep(remaining).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
