use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::extract::extract_nav;
use crate::http::{HttpClient, HttpRequest, NoopHttpClient};
use crate::nav_source::{NavRequest, NavSource, SourceError};
use crate::pacing::Pacing;
use crate::retry::RetryConfig;
use crate::{FetchOutcome, NavBatch, Ticker};

/// Per-fund page URL template: base + lowercased ticker slug.
const DEFAULT_PAGE_BASE: &str = "https://www.roundhillinvestments.com/etf/";
const DEFAULT_REFERER: &str = "https://www.roundhillinvestments.com/";

const FETCH_TIMEOUT_MS: u64 = 15_000;

/// NAV source that scrapes each fund's individual web page.
///
/// Tickers are processed strictly sequentially; the pacing delays between
/// fetches are deliberate and concurrency would defeat them. Each ticker
/// gets a bounded retry loop with exponential backoff, and after retries
/// exhaust the ticker resolves to unavailable rather than an error.
#[derive(Clone)]
pub struct FundPageFetcher {
    http_client: Arc<dyn HttpClient>,
    page_base: String,
    referer: String,
    retry: RetryConfig,
    pacing: Pacing,
}

impl Default for FundPageFetcher {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            page_base: String::from(DEFAULT_PAGE_BASE),
            referer: String::from(DEFAULT_REFERER),
            retry: RetryConfig::default(),
            pacing: Pacing::default(),
        }
    }
}

impl FundPageFetcher {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn with_page_base(mut self, page_base: impl Into<String>) -> Self {
        self.page_base = page_base.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    fn page_url(&self, ticker: &Ticker) -> String {
        format!(
            "{}{}/",
            self.page_base,
            urlencoding::encode(&ticker.slug())
        )
    }

    async fn fetch_batch(&self, req: NavRequest) -> NavBatch {
        let mut navs = BTreeMap::new();

        for (index, ticker) in req.tickers.into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing.between_tickers()).await;
            }

            let nav = self.fetch_one(&ticker).await;
            navs.insert(ticker, nav);
        }

        NavBatch {
            navs,
            // No listing page to enumerate from.
            available: None,
        }
    }

    /// Fetch one fund page with bounded retries and run the extraction chain.
    async fn fetch_one(&self, ticker: &Ticker) -> Option<f64> {
        let url = self.page_url(ticker);
        tracing::info!(ticker = %ticker, url = %url, "fetching fund page");

        for attempt in 0..=self.retry.max_retries {
            tokio::time::sleep(self.pacing.before_fetch()).await;

            let request = HttpRequest::get(&url)
                .with_browser_headers(&self.referer)
                .with_timeout_ms(FETCH_TIMEOUT_MS);

            let (outcome, transport_error) = match self.http_client.execute(request).await {
                Ok(response) => {
                    let plausible =
                        response.is_success() && self.retry.is_plausible_body(response.body.len());
                    if plausible {
                        let nav = extract_nav(&response.body);
                        let outcome =
                            FetchOutcome::new(response.status, response.body.len(), nav);
                        tracing::debug!(ticker = %ticker, attempt, ?outcome, "fund page fetched");
                        if nav.is_none() {
                            // The page rendered but no pattern matched; more
                            // attempts would see the same markup.
                            tracing::warn!(ticker = %ticker, "no NAV pattern matched");
                        }
                        return nav;
                    }
                    (
                        FetchOutcome::new(response.status, response.body.len(), None),
                        false,
                    )
                }
                Err(error) => {
                    tracing::debug!(ticker = %ticker, attempt, error = %error, "fund page fetch errored");
                    (FetchOutcome::new(0, 0, None), true)
                }
            };

            if attempt < self.retry.max_retries {
                let mut delay = self.retry.delay_for_attempt(attempt);
                if transport_error {
                    delay += self.retry.error_jitter();
                }
                tracing::debug!(
                    ticker = %ticker,
                    attempt,
                    status = outcome.status,
                    body_len = outcome.body_len,
                    delay_ms = delay.as_millis() as u64,
                    "retrying fund page fetch"
                );
                tokio::time::sleep(delay).await;
            } else {
                tracing::warn!(
                    ticker = %ticker,
                    status = outcome.status,
                    body_len = outcome.body_len,
                    "fund page fetch exhausted retries"
                );
            }
        }

        None
    }
}

impl NavSource for FundPageFetcher {
    fn id(&self) -> &'static str {
        "fund_pages"
    }

    fn method(&self) -> &'static str {
        "HTML"
    }

    fn fetch<'a>(
        &'a self,
        req: NavRequest,
    ) -> Pin<Box<dyn Future<Output = Result<NavBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.fetch_batch(req).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_uses_lowercased_slug() {
        let fetcher = FundPageFetcher::default();
        let ticker = Ticker::parse("TSLW").expect("valid");

        assert_eq!(
            fetcher.page_url(&ticker),
            "https://www.roundhillinvestments.com/etf/tslw/"
        );
    }

    #[test]
    fn page_base_is_configurable() {
        let fetcher = FundPageFetcher::default().with_page_base("https://origin.test/funds/");
        let ticker = Ticker::parse("MSTY").expect("valid");

        assert_eq!(fetcher.page_url(&ticker), "https://origin.test/funds/msty/");
    }
}
