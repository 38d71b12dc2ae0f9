//! Thin orchestration over one NAV source: input normalization, ticker
//! policy, and response assembly.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nav_source::{NavRequest, NavSource};
use crate::{NavBatch, Ticker, ValidationError};

/// Ticker wire input in any of the accepted request shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TickerInput {
    /// `{"tickers": ["TSLW", "MSTY"]}`
    Many(Vec<String>),
    /// `{"ticker": "TSLW"}` or `{"tickers": "TSLW,MSTY"}`
    One(String),
}

/// Which tickers a deployment agrees to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerPolicy {
    /// Attempt any requested ticker.
    PassThrough,
    /// Silently drop tickers outside the list.
    AllowList(BTreeSet<Ticker>),
}

impl TickerPolicy {
    pub fn allow_list<I, T>(tickers: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let set = tickers
            .into_iter()
            .map(|t| Ticker::parse(t.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self::AllowList(set))
    }

    fn permits(&self, ticker: &Ticker) -> bool {
        match self {
            Self::PassThrough => true,
            Self::AllowList(set) => set.contains(ticker),
        }
    }

    /// Tickers this deployment advertises, when it has a fixed list.
    pub fn advertised(&self) -> Option<Vec<String>> {
        match self {
            Self::PassThrough => None,
            Self::AllowList(set) => Some(set.iter().map(|t| t.as_str().to_string()).collect()),
        }
    }
}

/// Client-input errors the API layer maps to HTTP 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("no tickers requested")]
    EmptyRequest,
    #[error(transparent)]
    InvalidTicker(#[from] ValidationError),
}

/// Assembled response for one NAV request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavResponse {
    #[serde(rename = "navData")]
    pub nav_data: BTreeMap<String, Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tickers: Option<Vec<String>>,
}

/// Orchestrates one fetch per request: normalize, filter, delegate, shape.
pub struct NavService {
    source: Arc<dyn NavSource>,
    policy: TickerPolicy,
}

impl NavService {
    pub fn new(source: Arc<dyn NavSource>, policy: TickerPolicy) -> Self {
        Self { source, policy }
    }

    /// Acquisition method label of the underlying source.
    pub fn method(&self) -> &'static str {
        self.source.method()
    }

    pub fn supported_tickers(&self) -> Option<Vec<String>> {
        self.policy.advertised()
    }

    /// Resolve NAVs for the requested tickers.
    ///
    /// Origin-side failures never surface here; they degrade to `null`
    /// entries. Only malformed client input is an `Err`.
    pub async fn get_navs(&self, input: TickerInput) -> Result<NavResponse, ServiceError> {
        let requested = normalize(&input)?;

        let selected: Vec<Ticker> = requested
            .into_iter()
            .filter(|t| self.policy.permits(t))
            .collect();

        // Everything filtered out by the allow-list is an empty result,
        // not a client error.
        if selected.is_empty() {
            tracing::info!("no permitted tickers in request");
            return Ok(NavResponse {
                nav_data: BTreeMap::new(),
                message: None,
                available_tickers: None,
            });
        }

        let request = NavRequest::new(selected.clone())
            .map_err(|_| ServiceError::EmptyRequest)?;

        let batch = match self.source.fetch(request).await {
            Ok(batch) => batch,
            Err(error) => {
                tracing::warn!(source = self.source.id(), error = %error, "fetch degraded to all-unavailable");
                NavBatch::all_unavailable(&selected)
            }
        };

        Ok(assemble(&selected, batch))
    }
}

/// Normalize wire input into distinct canonical tickers, preserving request
/// order. Every accepted shape funnels through here, including the
/// comma-delimited string form.
fn normalize(input: &TickerInput) -> Result<Vec<Ticker>, ServiceError> {
    let raw: Vec<&str> = match input {
        TickerInput::Many(items) => items.iter().map(String::as_str).collect(),
        TickerInput::One(item) => vec![item.as_str()],
    };

    let mut seen = BTreeSet::new();
    let mut tickers = Vec::new();

    for item in raw {
        for part in item.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let ticker = Ticker::parse(part).map_err(ServiceError::InvalidTicker)?;
            if seen.insert(ticker.clone()) {
                tickers.push(ticker);
            }
        }
    }

    if tickers.is_empty() {
        return Err(ServiceError::EmptyRequest);
    }

    Ok(tickers)
}

fn assemble(selected: &[Ticker], batch: NavBatch) -> NavResponse {
    let nav_data: BTreeMap<String, Option<f64>> = selected
        .iter()
        .map(|ticker| {
            let nav = batch.navs.get(ticker).copied().flatten();
            (ticker.as_str().to_string(), nav)
        })
        .collect();

    // "Not found" means absent from the source entirely; a ticker that was
    // found but carried an unusable NAV cell is already null in nav_data.
    let (message, available_tickers) = match &batch.available {
        Some(available) => {
            let missing = selected
                .iter()
                .filter(|t| !available.contains(t))
                .count();
            if missing > 0 {
                (
                    Some(format!("{missing} requested ticker(s) not found in the NAV feed")),
                    Some(available.iter().map(|t| t.as_str().to_string()).collect()),
                )
            } else {
                (None, None)
            }
        }
        None => (None, None),
    };

    NavResponse {
        nav_data,
        message,
        available_tickers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_list_input_with_dedup() {
        let input = TickerInput::Many(vec![
            String::from("tslw"),
            String::from("MSTY"),
            String::from("TSLW"),
        ]);
        let tickers = normalize(&input).expect("valid input");

        let names: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(names, vec!["TSLW", "MSTY"]);
    }

    #[test]
    fn normalizes_comma_delimited_string() {
        let input = TickerInput::One(String::from("tslw, msty ,,YBTC"));
        let tickers = normalize(&input).expect("valid input");

        let names: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(names, vec!["TSLW", "MSTY", "YBTC"]);
    }

    #[test]
    fn empty_input_is_a_client_error() {
        let input = TickerInput::Many(vec![]);
        assert_eq!(normalize(&input), Err(ServiceError::EmptyRequest));

        let input = TickerInput::One(String::from(" , ,"));
        assert_eq!(normalize(&input), Err(ServiceError::EmptyRequest));
    }

    #[test]
    fn invalid_symbol_is_a_client_error() {
        let input = TickerInput::One(String::from("TS$LW"));
        assert!(matches!(
            normalize(&input),
            Err(ServiceError::InvalidTicker(_))
        ));
    }

    #[test]
    fn allow_list_permits_only_listed_tickers() {
        let policy = TickerPolicy::allow_list(["TSLW", "MSTY"]).expect("valid list");

        assert!(policy.permits(&Ticker::parse("tslw").expect("valid")));
        assert!(!policy.permits(&Ticker::parse("NVDA").expect("valid")));
        assert_eq!(
            policy.advertised(),
            Some(vec![String::from("MSTY"), String::from("TSLW")])
        );
    }

    #[test]
    fn pass_through_advertises_nothing() {
        assert_eq!(TickerPolicy::PassThrough.advertised(), None);
    }
}
