//! API route handlers and their JSON shapes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use navfeed_core::{ServiceError, TickerInput};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

/// Body of `POST /get-nav`. Accepts `{"tickers": [..]}`, `{"ticker": "x"}`,
/// or `{"tickers": "A,B,C"}`.
#[derive(Debug, Deserialize)]
pub struct GetNavRequest {
    #[serde(default)]
    tickers: Option<TickerInput>,
    #[serde(default)]
    ticker: Option<String>,
}

impl GetNavRequest {
    fn into_input(self) -> Option<TickerInput> {
        match (self.tickers, self.ticker) {
            (Some(input), _) => Some(input),
            (None, Some(single)) => Some(TickerInput::One(single)),
            (None, None) => None,
        }
    }
}

/// `GET /` — service metadata.
pub async fn home(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut body = json!({
        "status": "online",
        "service": "navfeed NAV API",
        "version": env!("CARGO_PKG_VERSION"),
        "method": state.service.method(),
    });
    if let Some(tickers) = state.service.supported_tickers() {
        body["supported_tickers"] = json!(tickers);
    }
    Json(body)
}

/// `GET /health` — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// `POST /get-nav` — resolve NAVs for the requested tickers.
///
/// Origin failures come back as 200 with null entries; only malformed
/// client input earns a 400.
pub async fn get_nav(
    State(state): State<AppState>,
    payload: Result<Json<GetNavRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let Some(input) = body.into_input() else {
        return bad_request("request must include a 'tickers' or 'ticker' field");
    };

    match state.service.get_navs(input).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error @ ServiceError::EmptyRequest) => bad_request(error.to_string()),
        Err(error @ ServiceError::InvalidTicker(_)) => bad_request(error.to_string()),
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    let body = json!({
        "error": message.into(),
        "usage": [
            { "tickers": ["TSLW", "MSTY"] },
            { "ticker": "TSLW" },
            { "tickers": "TSLW,MSTY" },
        ],
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
