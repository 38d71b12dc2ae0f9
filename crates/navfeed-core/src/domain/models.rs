use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Ticker;

/// Result of one NAV fetch batch.
///
/// `navs` carries exactly one entry per distinct requested ticker; a ticker
/// the source could not resolve maps to `None` rather than being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavBatch {
    pub navs: BTreeMap<Ticker, Option<f64>>,
    /// Every ticker the source itself knows about, when the source can
    /// enumerate them (the CSV feed can; per-fund pages cannot).
    pub available: Option<Vec<Ticker>>,
}

impl NavBatch {
    /// Batch with every requested ticker marked unavailable.
    pub fn all_unavailable(tickers: &[Ticker]) -> Self {
        Self {
            navs: tickers.iter().cloned().map(|t| (t, None)).collect(),
            available: None,
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.navs.values().filter(|v| v.is_some()).count()
    }
}

/// Transient record of a single page-fetch attempt. Consumed immediately for
/// retry decisions and debug logging; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchOutcome {
    pub status: u16,
    pub body_len: usize,
    pub nav: Option<f64>,
}

impl FetchOutcome {
    pub const fn new(status: u16, body_len: usize, nav: Option<f64>) -> Self {
        Self {
            status,
            body_len,
            nav,
        }
    }
}
