//! Randomized delays that soften the request-rate signature of a scrape.
//!
//! These delays carry no correctness weight. They exist so a batch of
//! per-fund page fetches does not look like scripted traffic, and they can
//! be disabled wholesale for tests.

use std::time::Duration;

/// Randomized pacing applied around page fetches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacing {
    /// Delay range drawn before every individual page fetch, in ms.
    pub before_fetch_ms: (u64, u64),
    /// Delay range drawn between successive tickers of a batch, in ms.
    pub between_tickers_ms: (u64, u64),
    pub enabled: bool,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            before_fetch_ms: (200, 800),
            between_tickers_ms: (1_000, 2_000),
            enabled: true,
        }
    }
}

impl Pacing {
    /// No-op pacing for deterministic tests.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn before_fetch(&self) -> Duration {
        self.draw(self.before_fetch_ms)
    }

    pub fn between_tickers(&self) -> Duration {
        self.draw(self.between_tickers_ms)
    }

    fn draw(&self, (lo, hi): (u64, u64)) -> Duration {
        if !self.enabled || hi == 0 {
            return Duration::ZERO;
        }
        if hi <= lo {
            return Duration::from_millis(lo);
        }
        Duration::from_millis(fastrand::u64(lo..=hi))
    }
}
