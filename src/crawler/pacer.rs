//! Randomized request pacing
//!
//! The scraper waits a random, uniformly distributed interval after every
//! request so the target site sees spaced, irregular traffic. The interval
//! bounds are fixed for the whole run.

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;

/// Sleeps for a random duration between two fixed bounds
#[derive(Debug, Clone)]
pub struct Pacer {
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl Pacer {
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            min_delay_ms: config.min_delay_ms.min(config.max_delay_ms),
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// A pacer that never waits
    pub fn disabled() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Draws the next delay from `[min, max]`
    pub fn next_delay(&self) -> Duration {
        let ms = if self.min_delay_ms == self.max_delay_ms {
            self.min_delay_ms
        } else {
            rand::rng().random_range(self.min_delay_ms..=self.max_delay_ms)
        };
        Duration::from_millis(ms)
    }

    /// Waits for the next delay
    pub async fn pace(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }

        tracing::trace!("Pacing for {}ms", delay.as_millis());
        tokio::time::sleep(delay).await;
    }
}
