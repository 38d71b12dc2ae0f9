//! Retry policy for page fetches: exponential backoff plus error-path jitter.

use std::time::Duration;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Fixed delay between retries.
    Fixed {
        delay: Duration,
    },
    /// Exponential delay: `base * (factor ^ attempt)`, capped at `max`.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        // Delay before retry n (0-indexed) is 2^n * 2s: 2s, then 4s.
        Self::Exponential {
            base: Duration::from_secs(2),
            factor: 2.0,
            max: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    /// Delay for a given retry attempt (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential { base, factor, max } => {
                let scale = factor.powi(attempt as i32);
                let seconds = base.as_secs_f64() * scale;
                Duration::from_secs_f64(seconds.min(max.as_secs_f64()))
            }
        }
    }
}

/// Retry policy for one ticker's page fetch.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries. Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Backoff strategy between retries.
    pub backoff: Backoff,
    /// Bodies shorter than this are treated as block pages or redirect
    /// stubs and retried even when the status is 2xx.
    pub short_body_threshold: usize,
    /// Jitter range added on the transport-error path, in milliseconds.
    pub error_jitter_ms: (u64, u64),
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::default(),
            short_body_threshold: 2_048,
            error_jitter_ms: (300, 1_500),
        }
    }
}

impl RetryConfig {
    /// Policy with no delays, for tests that only count attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed {
                delay: Duration::ZERO,
            },
            error_jitter_ms: (0, 0),
            ..Self::default()
        }
    }

    /// Whether a body of this length is plausible page content.
    pub fn is_plausible_body(&self, body_len: usize) -> bool {
        body_len >= self.short_body_threshold
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    /// Random jitter drawn for a transport-error retry.
    pub fn error_jitter(&self) -> Duration {
        let (lo, hi) = self.error_jitter_ms;
        if hi <= lo {
            return Duration::from_millis(lo);
        }
        Duration::from_millis(fastrand::u64(lo..=hi))
    }
}
