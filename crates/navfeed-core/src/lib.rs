//! # Navfeed Core
//!
//! Fetchers, extraction logic, and domain contracts for the navfeed NAV
//! service: daily Net Asset Value quotes scraped from a fund manager's
//! public website and served over a small JSON API.
//!
//! ## Overview
//!
//! Two acquisition strategies sit behind one [`NavSource`] trait:
//!
//! - [`CsvFeedFetcher`] downloads the family's single published NAV CSV and
//!   answers a whole batch from one request.
//! - [`FundPageFetcher`] scrapes each fund's individual page, extracting the
//!   NAV figure via an ordered pattern chain with bounded retry/backoff and
//!   randomized pacing between fetches.
//!
//! [`NavService`] is the thin layer the HTTP API talks to: it normalizes
//! ticker input, applies the deployment's [`TickerPolicy`], delegates to a
//! source, and shapes the per-ticker NAV-or-null response.
//!
//! Every request is stateless: no cache, no persistence, each call
//! re-fetches from the origin.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | NAV sources (CSV feed, fund pages) |
//! | [`config`] | Environment-driven runtime settings |
//! | [`domain`] | Domain types (Ticker, NavBatch, FetchOutcome) |
//! | [`error`] | Core error types |
//! | [`extract`] | NAV extraction chain over page text |
//! | [`http`] | HTTP transport abstraction |
//! | [`nav_source`] | Fetcher contract and errors |
//! | [`pacing`] | Randomized request-rate shaping |
//! | [`retry`] | Bounded retry with exponential backoff |
//! | [`service`] | Orchestration and response assembly |
//!
//! ## Error handling
//!
//! Origin-side failures are absorbed: a ticker the origin cannot resolve
//! maps to `null`, and a whole fetch failing degrades every requested
//! ticker to `null`. Only malformed client input surfaces as an error.
//!
//! ## Security
//!
//! TLS certificate verification is on by default;
//! [`ReqwestHttpClient::insecure`] is the explicit, logged opt-out.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod http;
pub mod nav_source;
pub mod pacing;
pub mod retry;
pub mod service;

// Re-export commonly used types at crate root for convenience

pub use adapters::{CsvFeedFetcher, FundPageFetcher};

pub use config::{FetcherKind, Settings, DEFAULT_ALLOW_LIST};

pub use domain::{FetchOutcome, NavBatch, Ticker};

pub use error::ValidationError;

pub use extract::extract_nav;

pub use http::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use nav_source::{NavRequest, NavSource, SourceError, SourceErrorKind};

pub use pacing::Pacing;

pub use retry::{Backoff, RetryConfig};

pub use service::{NavResponse, NavService, ServiceError, TickerInput, TickerPolicy};
