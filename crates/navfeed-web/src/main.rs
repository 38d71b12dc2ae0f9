//! # navfeed-web
//!
//! JSON HTTP API over [`navfeed_core`]: NAV lookups for fund tickers,
//! backed by either the CSV feed or per-fund page scraping.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use navfeed_core::{
    CsvFeedFetcher, FetcherKind, FundPageFetcher, NavService, NavSource, ReqwestHttpClient,
    Settings, TickerPolicy, DEFAULT_ALLOW_LIST,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    service: Arc<NavService>,
}

fn build_service(settings: &Settings) -> NavService {
    let http_client: Arc<dyn navfeed_core::HttpClient> = if settings.insecure_tls {
        tracing::warn!("TLS certificate verification disabled via NAV_INSECURE_TLS");
        Arc::new(ReqwestHttpClient::insecure())
    } else {
        Arc::new(ReqwestHttpClient::new())
    };

    let source: Arc<dyn NavSource> = match settings.fetcher {
        FetcherKind::Csv => {
            let mut fetcher = CsvFeedFetcher::with_http_client(http_client);
            if let Some(url) = &settings.csv_url {
                fetcher = fetcher.with_csv_url(url);
            }
            Arc::new(fetcher)
        }
        FetcherKind::Pages => {
            let mut fetcher = FundPageFetcher::with_http_client(http_client);
            if let Some(base) = &settings.page_base {
                fetcher = fetcher.with_page_base(base);
            }
            Arc::new(fetcher)
        }
    };

    let policy = if settings.allow_all {
        TickerPolicy::PassThrough
    } else {
        TickerPolicy::allow_list(DEFAULT_ALLOW_LIST)
            .expect("default allow-list tickers must be valid")
    };

    NavService::new(source, policy)
}

pub fn app(service: NavService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        .route("/get-nav", post(routes::get_nav))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState {
            service: Arc::new(service),
        })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "navfeed_web=info,navfeed_core=info,tower_http=info".into()),
        )
        .init();

    let settings = Settings::from_env();
    let service = build_service(&settings);
    let app = app(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("navfeed-web v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("server terminated unexpectedly");
}
