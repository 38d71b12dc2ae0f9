//! Canonical domain types for navfeed.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated, uppercase-normalized fund ticker |
//! | [`NavBatch`] | One NAV-or-unavailable entry per requested ticker |
//! | [`FetchOutcome`] | Transient record of a single page-fetch attempt |

mod models;
mod ticker;

pub use models::{FetchOutcome, NavBatch};
pub use ticker::Ticker;
