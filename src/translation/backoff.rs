/*!
 * Retry backoff policies for provider requests.
 *
 * Each provider carries its own policy: how many times it may be asked for
 * the same chunk and how long to wait between attempts.
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the delay grows from one retry to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    /// base, base*factor, base*factor^2, ...
    Exponential,
    /// base, 2*base, 3*base, ...
    Linear,
}

/// Attempt cap plus delay-growth rule applied on retryable failures
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Total attempts allowed against one provider, first request included
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Growth rule
    pub growth: Growth,
    /// Multiplier for exponential growth
    pub factor: f64,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// Exponential policy: `base * factor^(retry-1)`, capped
    pub fn exponential(max_attempts: u32, base_delay: Duration, factor: f64, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            growth: Growth::Exponential,
            factor,
            max_delay,
        }
    }

    /// Linear policy: `base * retry`, capped
    pub fn linear(max_attempts: u32, step: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: step,
            growth: Growth::Linear,
            factor: 1.0,
            max_delay,
        }
    }

    /// Policy with no waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self::linear(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Delay to wait before retry number `retry` (1-based)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let retry = retry.max(1);
        let base_ms = self.base_delay.as_millis() as f64;
        let delay_ms = match self.growth {
            Growth::Exponential => {
                let exponent = (retry - 1).min(16) as i32;
                base_ms * self.factor.max(1.0).powi(exponent)
            }
            Growth::Linear => base_ms * retry as f64,
        };
        let capped = delay_ms.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped.max(0.0) as u64)
    }

    /// Whether another attempt is allowed after `attempts_made` requests
    pub fn allows_another(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }
}
