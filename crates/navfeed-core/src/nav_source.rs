//! Fetcher contract shared by the CSV-feed and fund-page sources.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{NavBatch, Ticker};

/// Fetcher-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    InvalidRequest,
    Parse,
    Internal,
}

/// Structured fetcher error.
///
/// Origin-side failures are normally absorbed into per-ticker `None` values
/// by the fetchers themselves; this type covers the cases that cannot be,
/// such as an empty request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Parse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Parse => "source.parse",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for a NAV fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub tickers: Vec<Ticker>,
}

impl NavRequest {
    pub fn new(tickers: Vec<Ticker>) -> Result<Self, SourceError> {
        if tickers.is_empty() {
            return Err(SourceError::invalid_request(
                "nav request must include at least one ticker",
            ));
        }
        Ok(Self { tickers })
    }
}

/// NAV source contract.
///
/// Implementations must be `Send + Sync`; the service holds them behind an
/// `Arc<dyn NavSource>` shared across request handlers.
pub trait NavSource: Send + Sync {
    /// Short identifier for logs and the service-metadata endpoint.
    fn id(&self) -> &'static str;

    /// Acquisition method label reported by the service-metadata endpoint.
    fn method(&self) -> &'static str;

    /// Fetch NAVs for the requested tickers.
    ///
    /// The returned batch contains exactly one entry per distinct requested
    /// ticker; tickers the origin could not resolve map to `None`. A whole
    /// fetch failing (network, status, structure) is still a `Ok` batch of
    /// `None`s — only an invalid request is an `Err`.
    fn fetch<'a>(
        &'a self,
        req: NavRequest,
    ) -> Pin<Box<dyn Future<Output = Result<NavBatch, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_request_is_rejected() {
        let error = NavRequest::new(vec![]).expect_err("empty tickers should fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(!error.retryable());
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(SourceError::parse("x").code(), "source.parse");
    }
}
