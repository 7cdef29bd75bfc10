//! Pacing policies consulted between users of a search.
//!
//! GitHub's unauthenticated API allows very few requests per minute, and each
//! user costs two to four calls. The orchestrator calls [`Pacer::pause`] after
//! every extraction step so the policy can be changed without touching the
//! extraction code.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{PacingConfig, PacingStrategy};
use crate::sources::SourceError;

/// A throttling policy
#[async_trait]
pub trait Pacer: Send + Sync + fmt::Debug {
    /// Wait until the next user may be processed
    async fn pause(&self);

    /// Short human-readable description
    fn describe(&self) -> String;
}

/// Sleep for a fixed duration every time
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn describe(&self) -> String {
        format!("fixed {}ms", self.delay.as_millis())
    }
}

/// Never wait
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl Pacer for NoDelay {
    async fn pause(&self) {}

    fn describe(&self) -> String {
        "none".to_string()
    }
}

/// Token bucket over users (not API calls) with a burst of one, so users are spread evenly
pub struct QuotaPacer {
    limiter: DefaultDirectRateLimiter,
    per_minute: NonZeroU32,
}

impl QuotaPacer {
    pub fn per_minute(per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(per_minute).allow_burst(nonzero!(1u32));
        Self {
            limiter: RateLimiter::direct(quota),
            per_minute,
        }
    }
}

impl fmt::Debug for QuotaPacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuotaPacer")
            .field("per_minute", &self.per_minute)
            .finish()
    }
}

#[async_trait]
impl Pacer for QuotaPacer {
    async fn pause(&self) {
        self.limiter.until_ready().await;
    }

    fn describe(&self) -> String {
        format!("quota {} users/min", self.per_minute)
    }
}

/// Build the pacer selected by the configuration
pub fn pacer_from_config(config: &PacingConfig) -> Result<Arc<dyn Pacer>, SourceError> {
    let pacer: Arc<dyn Pacer> = match config.strategy {
        PacingStrategy::Fixed => Arc::new(FixedDelay::new(Duration::from_millis(config.delay_ms))),
        PacingStrategy::Quota => {
            let per_minute = NonZeroU32::new(config.users_per_minute).ok_or_else(|| {
                SourceError::InvalidConfig(
                    "pacing.users_per_minute must be greater than zero".to_string(),
                )
            })?;
            Arc::new(QuotaPacer::per_minute(per_minute))
        }
        PacingStrategy::Disabled => Arc::new(NoDelay),
    };

    tracing::debug!("Pacing policy: {}", pacer.describe());
    Ok(pacer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_fixed_delay_waits() {
        let pacer = FixedDelay::new(Duration::from_millis(20));
        let start = Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_quota_pacer_first_call_is_immediate() {
        let pacer = QuotaPacer::per_minute(nonzero!(6000u32));
        let start = Instant::now();
        pacer.pause().await;
        pacer.pause().await;
        // Second call waits for one 10ms replenish interval at most.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_pacer_from_config() {
        let fixed = pacer_from_config(&PacingConfig::fixed(250)).unwrap();
        assert_eq!(fixed.describe(), "fixed 250ms");

        let none = pacer_from_config(&PacingConfig::disabled()).unwrap();
        assert_eq!(none.describe(), "none");
        tokio_test::block_on(none.pause());

        let quota = pacer_from_config(&PacingConfig {
            strategy: PacingStrategy::Quota,
            delay_ms: 0,
            users_per_minute: 30,
        })
        .unwrap();
        assert_eq!(quota.describe(), "quota 30 users/min");
    }

    #[test]
    fn test_zero_quota_is_rejected() {
        let result = pacer_from_config(&PacingConfig {
            strategy: PacingStrategy::Quota,
            delay_ms: 0,
            users_per_minute: 0,
        });
        assert!(matches!(result, Err(SourceError::InvalidConfig(_))));
    }
}
