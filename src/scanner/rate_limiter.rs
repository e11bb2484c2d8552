//! Global probe pacing.
//!
//! Every worker shares one limiter, so the delay bounds the aggregate probe
//! rate no matter how many hosts are scanned concurrently.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovLimiter};
use std::sync::Arc;
use std::time::Duration;

type DirectLimiter = GovLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Error type for pacing configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PacingError {
    #[error("rate limit must be a finite, non-negative number of seconds (got {0})")]
    InvalidDelay(f64),
}

/// Enforces a minimum spacing between successive probes, process-wide.
///
/// Backed by a GCRA limiter with a burst of one and a replenish period equal
/// to the delay, so no two `throttle()` calls complete less than `delay`
/// apart. Clones share the same state.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Option<Arc<DirectLimiter>>,
    delay: Duration,
}

impl RateLimiter {
    /// Create a limiter with the given spacing. A zero delay disables pacing.
    pub fn new(delay: Duration) -> Self {
        let limiter = Quota::with_period(delay).map(|quota| Arc::new(GovLimiter::direct(quota)));
        Self { limiter, delay }
    }

    /// Create a limiter from a delay in (fractional) seconds.
    pub fn from_secs_f64(secs: f64) -> Result<Self, PacingError> {
        let delay = Duration::try_from_secs_f64(secs).map_err(|_| PacingError::InvalidDelay(secs))?;
        Ok(Self::new(delay))
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait until the next probe is allowed.
    pub async fn throttle(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// The configured spacing between probes.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("delay", &self.delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    // The limiter's clock and `Instant` are separate sources; allow a hair of skew.
    const SKEW: Duration = Duration::from_millis(5);

    #[tokio::test]
    async fn test_zero_delay_is_noop() {
        let limiter = RateLimiter::unlimited();
        assert!(!limiter.is_enabled());
        let start = Instant::now();
        for _ in 0..1000 {
            limiter.throttle().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_sequential_calls_are_spaced() {
        let limiter = RateLimiter::from_secs_f64(0.5).unwrap();
        let start = Instant::now();
        for _ in 0..3 {
            limiter.throttle().await;
        }
        assert!(start.elapsed() + SKEW >= Duration::from_secs(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pacing_is_global_across_workers() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    limiter.throttle().await;
                    Instant::now()
                })
            })
            .collect();

        let mut completions = Vec::new();
        for handle in handles {
            completions.push(handle.await.unwrap());
        }
        completions.sort();
        for pair in completions.windows(2) {
            assert!(pair[1] - pair[0] + SKEW >= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_rejects_invalid_delays() {
        assert!(RateLimiter::from_secs_f64(-0.1).is_err());
        assert!(RateLimiter::from_secs_f64(f64::NAN).is_err());
        assert!(RateLimiter::from_secs_f64(f64::INFINITY).is_err());
        assert_eq!(
            RateLimiter::from_secs_f64(0.25).unwrap().delay(),
            Duration::from_millis(250)
        );
    }
}
