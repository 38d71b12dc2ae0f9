//! Behavior tests for NavService: normalization, ticker policy, and the
//! one-entry-per-requested-ticker response invariant.

use navfeed_tests::*;

const FEED: &str = "\
Fund Ticker,NAV
TSLW,12.34
MSTY,22.18
";

fn csv_service(client: ScriptedHttpClient, policy: TickerPolicy) -> NavService {
    let source = CsvFeedFetcher::with_http_client(Arc::new(client));
    NavService::new(Arc::new(source), policy)
}

#[tokio::test]
async fn response_has_one_entry_per_distinct_requested_ticker() {
    // Given: a request that repeats a ticker in mixed casing
    let service = csv_service(
        ScriptedHttpClient::new().respond(200, FEED),
        TickerPolicy::PassThrough,
    );

    // When: NAVs are resolved
    let input = TickerInput::Many(vec![
        String::from("tslw"),
        String::from("TSLW"),
        String::from("msty"),
    ]);
    let response = service.get_navs(input).await.expect("valid request");

    // Then: duplicates collapse and every distinct ticker is present
    assert_eq!(response.nav_data.len(), 2);
    assert_eq!(response.nav_data.get("TSLW"), Some(&Some(12.34)));
    assert_eq!(response.nav_data.get("MSTY"), Some(&Some(22.18)));
}

#[tokio::test]
async fn comma_delimited_string_resolves_like_a_list() {
    let service = csv_service(
        ScriptedHttpClient::new().respond(200, FEED),
        TickerPolicy::PassThrough,
    );

    let input = TickerInput::One(String::from("tslw, msty"));
    let response = service.get_navs(input).await.expect("valid request");

    assert_eq!(response.nav_data.len(), 2);
    assert_eq!(response.nav_data.get("TSLW"), Some(&Some(12.34)));
}

#[tokio::test]
async fn allow_list_silently_drops_unlisted_tickers() {
    let policy = TickerPolicy::allow_list(["TSLW"]).expect("valid list");
    let service = csv_service(ScriptedHttpClient::new().respond(200, FEED), policy);

    let input = TickerInput::Many(vec![String::from("TSLW"), String::from("NVDA")]);
    let response = service.get_navs(input).await.expect("valid request");

    assert_eq!(response.nav_data.len(), 1);
    assert!(response.nav_data.contains_key("TSLW"));
    assert!(!response.nav_data.contains_key("NVDA"));
}

#[tokio::test]
async fn fully_filtered_request_yields_empty_nav_data_not_an_error() {
    let policy = TickerPolicy::allow_list(["TSLW"]).expect("valid list");
    let service = csv_service(ScriptedHttpClient::new(), policy);

    let input = TickerInput::One(String::from("NVDA"));
    let response = service.get_navs(input).await.expect("not a client error");

    assert!(response.nav_data.is_empty());
    assert!(response.message.is_none());
}

#[tokio::test]
async fn empty_input_is_a_client_error() {
    let service = csv_service(ScriptedHttpClient::new(), TickerPolicy::PassThrough);

    let result = service.get_navs(TickerInput::Many(vec![])).await;
    assert_eq!(result, Err(ServiceError::EmptyRequest));

    let result = service.get_navs(TickerInput::One(String::from("  "))).await;
    assert_eq!(result, Err(ServiceError::EmptyRequest));
}

#[tokio::test]
async fn invalid_symbol_is_a_client_error() {
    let service = csv_service(ScriptedHttpClient::new(), TickerPolicy::PassThrough);

    let result = service
        .get_navs(TickerInput::One(String::from("TS$LW")))
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidTicker(_))));
}

#[tokio::test]
async fn unreachable_origin_degrades_to_all_null_entries() {
    let service = csv_service(
        ScriptedHttpClient::new().fail("dns failure"),
        TickerPolicy::PassThrough,
    );

    let input = TickerInput::Many(vec![String::from("TSLW"), String::from("MSTY")]);
    let response = service.get_navs(input).await.expect("never an error");

    assert_eq!(response.nav_data.len(), 2);
    assert!(response.nav_data.values().all(Option::is_none));
}

#[tokio::test]
async fn missing_tickers_attach_message_and_available_set() {
    let service = csv_service(
        ScriptedHttpClient::new().respond(200, FEED),
        TickerPolicy::PassThrough,
    );

    let input = TickerInput::Many(vec![String::from("TSLW"), String::from("NVDA")]);
    let response = service.get_navs(input).await.expect("valid request");

    assert_eq!(response.nav_data.get("NVDA"), Some(&None));
    assert!(response.message.is_some());
    let available = response.available_tickers.expect("csv feed lists tickers");
    assert!(available.contains(&String::from("TSLW")));
    assert!(available.contains(&String::from("MSTY")));
}

#[tokio::test]
async fn unparseable_nav_cell_is_null_but_not_reported_as_not_found() {
    // Given: CONY exists in the feed but its NAV cell is garbage
    let feed = "Fund Ticker,NAV\nTSLW,12.34\nCONY,not-a-number\n";
    let service = csv_service(
        ScriptedHttpClient::new().respond(200, feed),
        TickerPolicy::PassThrough,
    );

    // When: both tickers are requested
    let input = TickerInput::Many(vec![String::from("TSLW"), String::from("CONY")]);
    let response = service.get_navs(input).await.expect("valid request");

    // Then: CONY degrades to null, but it was found, so no message
    assert_eq!(response.nav_data.get("CONY"), Some(&None));
    assert!(response.message.is_none());
    assert!(response.available_tickers.is_none());
}

#[tokio::test]
async fn response_serializes_under_the_nav_data_key() {
    let service = csv_service(
        ScriptedHttpClient::new().respond(200, FEED),
        TickerPolicy::PassThrough,
    );

    let input = TickerInput::One(String::from("TSLW"));
    let response = service.get_navs(input).await.expect("valid request");

    let value = serde_json::to_value(&response).expect("response should serialize");
    assert_eq!(value["navData"]["TSLW"], 12.34);
    // Optional fields are omitted entirely, not serialized as null.
    assert!(value.get("message").is_none());
    assert!(value.get("available_tickers").is_none());
}

#[tokio::test]
async fn fully_resolved_request_has_no_message() {
    let service = csv_service(
        ScriptedHttpClient::new().respond(200, FEED),
        TickerPolicy::PassThrough,
    );

    let input = TickerInput::One(String::from("TSLW"));
    let response = service.get_navs(input).await.expect("valid request");

    assert!(response.message.is_none());
    assert!(response.available_tickers.is_none());
}
