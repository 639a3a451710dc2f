//! Client-side request pacing.
//!
//! Ensures no two outbound generation requests start closer together than a
//! fixed interval. This is a pacing gate, not a token bucket: bursts beyond
//! the first call are serialized at exactly the interval, never smoothed.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum spacing between request starts (1 second)
pub const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(1000);

/// Process-wide pacing gate, shared by `Arc` into every request path.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    /// Start time of the most recent acquisition; `None` until the first.
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the default 1000 ms interval
    pub fn new() -> Self {
        Self::with_interval(RATE_LIMIT_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Wait until it is permissible to start a new request.
    ///
    /// Never rejects, only delays. The very first acquisition returns
    /// immediately. The lock is held across the sleep so concurrent callers
    /// serialize on the timestamp: whichever call takes the lock second is
    /// the one delayed, and two callers can never compute the same wait.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
