//! Gateway behaviour against a mocked Alpha Vantage server.

use digest_core::error::DataError;
use digest_core::traits::MarketDataSource;
use digest_core::types::Asset;
use digest_data::{AlphaVantageConfig, AlphaVantageSource, CredentialPool};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn daily_body() -> serde_json::Value {
    json!({
        "Meta Data": {"2. Symbol": "IBM"},
        "Time Series (Daily)": {
            "2024-03-01": {
                "1. open": "185.49", "2. high": "188.38", "3. low": "185.18",
                "4. close": "188.20", "5. volume": "4018354"
            },
            "2024-02-29": {
                "1. open": "186.15", "2. high": "186.85", "3. low": "184.69",
                "4. close": "185.03", "5. volume": "6458487"
            },
            "2024-02-28": {
                "1. open": "184.63", "2. high": "185.37", "3. low": "183.55",
                "4. close": "185.30", "5. volume": "3216184"
            }
        }
    })
}

fn source(server: &MockServer, keys: &[&str], max_retries: usize) -> (AlphaVantageSource, Arc<CredentialPool>) {
    let pool = Arc::new(CredentialPool::new(keys.iter().copied()).unwrap());
    let config = AlphaVantageConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        max_retries,
        backoff_min: Duration::from_millis(5),
        backoff_max: Duration::from_millis(20),
        requests_per_minute: 0,
        ..Default::default()
    };
    (AlphaVantageSource::new(config, pool.clone()).unwrap(), pool)
}

#[tokio::test]
async fn parses_daily_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", "IBM"))
        .and(query_param("apikey", "key-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (source, _) = source(&server, &["key-a"], 2);
    let raw = source.daily_series(&Asset::equity("IBM", "IBM")).await.unwrap();

    assert_eq!(raw.len(), 3);
    assert_eq!(raw["2024-02-29"].close, 185.03);
    assert_eq!(raw["2024-03-01"].volume, 4_018_354.0);
}

#[tokio::test]
async fn crypto_uses_digital_currency_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "DIGITAL_CURRENCY_DAILY"))
        .and(query_param("market", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Time Series (Digital Currency Daily)": {
                "2024-03-01": {
                    "1. open": "61130.0", "2. high": "63114.2", "3. low": "60777.0",
                    "4. close": "62387.9", "5. volume": "47737.9"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (source, _) = source(&server, &["key-a"], 0);
    let raw = source.daily_series(&Asset::crypto("BTC", "Bitcoin")).await.unwrap();
    assert_eq!(raw["2024-03-01"].close, 62387.9);
}

#[tokio::test]
async fn rotates_key_on_note_and_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("apikey", "key-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("apikey", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (source, pool) = source(&server, &["key-a", "key-b"], 3);
    let raw = source.daily_series(&Asset::equity("IBM", "")).await.unwrap();

    assert_eq!(raw.len(), 3);
    assert_eq!(pool.current(), "key-b");
}

#[tokio::test]
async fn concurrent_rate_limits_rotate_key_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("apikey", "key-a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"Note": "limit"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("apikey", "key-b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(2)
        .mount(&server)
        .await;

    let (source, pool) = source(&server, &["key-a", "key-b"], 1);
    let ibm = Asset::equity("IBM", "");
    let msft = Asset::equity("MSFT", "");
    let (first, second) = tokio::join!(source.daily_series(&ibm), source.daily_series(&msft));

    assert_eq!(first.unwrap().len(), 3);
    assert_eq!(second.unwrap().len(), 3);
    assert_eq!(pool.current(), "key-b");
}

#[tokio::test]
async fn error_message_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Error Message": "Invalid API call. Please retry or visit the documentation."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (source, pool) = source(&server, &["key-a", "key-b"], 3);
    let err = source.daily_series(&Asset::equity("NOPE", "")).await.unwrap_err();

    assert!(matches!(err, DataError::SymbolNotFound(_)));
    assert_eq!(pool.current(), "key-a");
}

#[tokio::test]
async fn http_429_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let (source, _) = source(&server, &["key-a", "key-b"], 2);
    let err = source.daily_series(&Asset::equity("IBM", "")).await.unwrap_err();
    assert!(matches!(err, DataError::RateLimited(_)));
}

#[tokio::test]
async fn server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (source, pool) = source(&server, &["key-a", "key-b"], 2);
    let raw = source.daily_series(&Asset::equity("IBM", "")).await.unwrap();

    assert_eq!(raw.len(), 3);
    // Transport failures keep the current key
    assert_eq!(pool.current(), "key-a");
}
