use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::http::{HttpClient, HttpRequest, NoopHttpClient};
use crate::nav_source::{NavRequest, NavSource, SourceError};
use crate::{NavBatch, Ticker};

/// Published CSV with daily NAV rows for every fund in the family.
const DEFAULT_CSV_URL: &str =
    "https://www.roundhillinvestments.com/assets/data/FilepointRoundhill.40RU.RU_DailyNAV.csv";
const DEFAULT_REFERER: &str = "https://www.roundhillinvestments.com/";

const TICKER_COLUMN: &str = "Fund Ticker";
const NAV_COLUMN: &str = "NAV";

const FETCH_TIMEOUT_MS: u64 = 15_000;

/// NAV source backed by the fund family's single published CSV file.
///
/// One download answers the whole batch. Any whole-fetch failure (network,
/// non-2xx status, missing columns) degrades every requested ticker to
/// unavailable; a bad NAV cell degrades only its own ticker.
#[derive(Clone)]
pub struct CsvFeedFetcher {
    http_client: Arc<dyn HttpClient>,
    csv_url: String,
    referer: String,
}

impl Default for CsvFeedFetcher {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            csv_url: String::from(DEFAULT_CSV_URL),
            referer: String::from(DEFAULT_REFERER),
        }
    }
}

impl CsvFeedFetcher {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn with_csv_url(mut self, csv_url: impl Into<String>) -> Self {
        self.csv_url = csv_url.into();
        self
    }

    async fn fetch_batch(&self, req: NavRequest) -> NavBatch {
        tracing::info!(url = %self.csv_url, tickers = req.tickers.len(), "fetching NAV csv");

        let request = HttpRequest::get(&self.csv_url)
            .with_browser_headers(&self.referer)
            .with_timeout_ms(FETCH_TIMEOUT_MS);

        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "csv fetch failed; all tickers unavailable");
                return NavBatch::all_unavailable(&req.tickers);
            }
        };

        if !response.is_success() {
            tracing::warn!(status = response.status, "csv fetch returned non-success status");
            return NavBatch::all_unavailable(&req.tickers);
        }

        let table = match parse_feed(&response.body) {
            Ok(table) => table,
            Err(error) => {
                tracing::warn!(error = %error, "csv feed unparseable; all tickers unavailable");
                return NavBatch::all_unavailable(&req.tickers);
            }
        };

        tracing::info!(rows = table.by_ticker.len(), "csv feed parsed");

        let navs: BTreeMap<Ticker, Option<f64>> = req
            .tickers
            .into_iter()
            .map(|ticker| {
                let nav = table.by_ticker.get(ticker.as_str()).copied().flatten();
                (ticker, nav)
            })
            .collect();

        NavBatch {
            navs,
            available: Some(table.available),
        }
    }
}

impl NavSource for CsvFeedFetcher {
    fn id(&self) -> &'static str {
        "csv_feed"
    }

    fn method(&self) -> &'static str {
        "CSV"
    }

    fn fetch<'a>(
        &'a self,
        req: NavRequest,
    ) -> Pin<Box<dyn Future<Output = Result<NavBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.fetch_batch(req).await) })
    }
}

/// Parsed CSV contents keyed by uppercase ticker. First row wins on
/// duplicate tickers.
#[derive(Debug)]
struct FeedTable {
    by_ticker: BTreeMap<String, Option<f64>>,
    available: Vec<Ticker>,
}

fn parse_feed(body: &str) -> Result<FeedTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| SourceError::parse(format!("csv header unreadable: {e}")))?
        .clone();

    let ticker_idx = column_index(&headers, TICKER_COLUMN)
        .ok_or_else(|| SourceError::parse(format!("csv missing '{TICKER_COLUMN}' column")))?;
    let nav_idx = column_index(&headers, NAV_COLUMN)
        .ok_or_else(|| SourceError::parse(format!("csv missing '{NAV_COLUMN}' column")))?;

    let mut by_ticker = BTreeMap::new();
    let mut available = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            // A single mangled row should not sink the rest of the file.
            Err(error) => {
                tracing::debug!(error = %error, "skipping unreadable csv row");
                continue;
            }
        };

        let Some(raw_ticker) = record.get(ticker_idx).map(str::trim) else {
            continue;
        };
        let Ok(ticker) = Ticker::parse(raw_ticker) else {
            continue;
        };

        let nav = record.get(nav_idx).and_then(coerce_nav);

        if !by_ticker.contains_key(ticker.as_str()) {
            by_ticker.insert(ticker.as_str().to_string(), nav);
            available.push(ticker);
        }
    }

    Ok(FeedTable {
        by_ticker,
        available,
    })
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

/// Coerce a NAV cell to a decimal. Empty cells and non-numeric strings are
/// a per-ticker soft failure, not an error.
fn coerce_nav(cell: &str) -> Option<f64> {
    let cell = cell.trim().trim_start_matches('$');
    if cell.is_empty() {
        return None;
    }
    let value: f64 = cell.replace(',', "").parse().ok()?;
    value.is_finite().then_some(value)
}
