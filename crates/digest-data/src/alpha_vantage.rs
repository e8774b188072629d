//! Alpha Vantage daily series client.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use digest_core::error::DataError;
use digest_core::traits::MarketDataSource;
use digest_core::types::{Asset, AssetClass, RawBar, RawSeries};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::credentials::{mask_key, CredentialPool};
use crate::rate_limit::RequestPacer;

/// Public Alpha Vantage endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// How much history the equity endpoint returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest 100 bars
    Compact,
    /// Full history
    #[default]
    Full,
}

impl OutputSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: usize,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
    pub outputsize: OutputSize,
    /// Token bucket rate; 0 disables pacing
    pub requests_per_minute: u32,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff_min: Duration::from_secs(1),
            backoff_max: Duration::from_secs(60),
            outputsize: OutputSize::Full,
            requests_per_minute: 5,
        }
    }
}

/// Daily series from Alpha Vantage, for equities and crypto.
pub struct AlphaVantageSource {
    client: reqwest::Client,
    config: AlphaVantageConfig,
    credentials: Arc<CredentialPool>,
    pacer: RequestPacer,
}

impl AlphaVantageSource {
    pub fn new(
        config: AlphaVantageConfig,
        credentials: Arc<CredentialPool>,
    ) -> Result<Self, DataError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::Http(format!("failed to build HTTP client: {}", e)))?;
        let pacer = RequestPacer::per_minute(config.requests_per_minute);

        debug!(
            base_url = %config.base_url,
            keys = credentials.len(),
            requests_per_minute = config.requests_per_minute,
            "Alpha Vantage client initialised"
        );

        Ok(Self {
            client,
            config,
            credentials,
            pacer,
        })
    }

    pub fn config(&self) -> &AlphaVantageConfig {
        &self.config
    }

    /// Query parameters for one request.
    pub fn query_params(&self, asset: &Asset, api_key: &str) -> Vec<(&'static str, String)> {
        match asset.class {
            AssetClass::Equity => vec![
                ("function", "TIME_SERIES_DAILY".to_string()),
                ("symbol", asset.symbol.clone()),
                ("outputsize", self.config.outputsize.as_str().to_string()),
                ("apikey", api_key.to_string()),
            ],
            AssetClass::Crypto => vec![
                ("function", "DIGITAL_CURRENCY_DAILY".to_string()),
                ("symbol", asset.symbol.clone()),
                ("market", "USD".to_string()),
                ("apikey", api_key.to_string()),
            ],
        }
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.config.backoff_min)
            .with_max_delay(self.config.backoff_max)
            .with_max_times(self.config.max_retries)
            .with_jitter()
    }

    /// One paced request, without retries.
    async fn fetch_once(&self, asset: &Asset) -> Result<RawSeries, DataError> {
        self.pacer.wait().await;

        let api_key = self.credentials.current();
        let url = format!("{}/query", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&self.query_params(asset, &api_key))
            .send()
            .await
            .map_err(|e| DataError::Http(format!("request for {} failed: {}", asset.symbol, e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            self.rotate(&api_key);
            return Err(DataError::RateLimited(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(DataError::Http(format!("{} returned {}", asset.symbol, status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("invalid JSON for {}: {}", asset.symbol, e)))?;

        let result = parse_daily_response(&asset.symbol, &body);
        if matches!(result, Err(DataError::RateLimited(_))) {
            self.rotate(&api_key);
        }
        result
    }

    fn rotate(&self, exhausted: &str) {
        let next = self.credentials.advance_from(exhausted);
        warn!(
            exhausted = %mask_key(exhausted),
            next = %mask_key(&next),
            "Provider rate limit hit, rotating API key"
        );
    }
}

#[async_trait]
impl MarketDataSource for AlphaVantageSource {
    #[instrument(skip(self), fields(symbol = %asset.symbol, class = %asset.class))]
    async fn daily_series(&self, asset: &Asset) -> Result<RawSeries, DataError> {
        let series = (|| self.fetch_once(asset))
            .retry(self.backoff())
            .when(|e: &DataError| e.is_retryable())
            .notify(|err: &DataError, delay: Duration| {
                warn!(error = %err, delay_ms = delay.as_millis() as u64, "Retrying request");
            })
            .await?;

        debug!(bars = series.len(), "Fetched daily series");
        Ok(series)
    }

    fn name(&self) -> &str {
        "alpha_vantage"
    }
}

/// Interpret an Alpha Vantage JSON body.
///
/// `"Error Message"` means an unknown symbol. `"Note"` and `"Information"`
/// are how the provider reports exhausted quota.
pub fn parse_daily_response(symbol: &str, body: &Value) -> Result<RawSeries, DataError> {
    let object = body
        .as_object()
        .ok_or_else(|| DataError::Parse(format!("response for {} is not an object", symbol)))?;

    if let Some(message) = object.get("Error Message") {
        return Err(DataError::SymbolNotFound(format!("{}: {}", symbol, text(message))));
    }
    for key in ["Note", "Information"] {
        if let Some(message) = object.get(key) {
            return Err(DataError::RateLimited(text(message)));
        }
    }

    let series = object
        .iter()
        .find(|(key, _)| key.starts_with("Time Series"))
        .and_then(|(_, value)| value.as_object())
        .ok_or_else(|| DataError::Parse(format!("no time series in response for {}", symbol)))?;

    let mut raw = RawSeries::with_capacity(series.len());
    for (date, fields) in series {
        let fields = fields
            .as_object()
            .ok_or_else(|| DataError::Parse(format!("{} {}: bar is not an object", symbol, date)))?;
        raw.insert(date.clone(), parse_bar(symbol, date, fields)?);
    }

    if raw.is_empty() {
        return Err(DataError::NoDataAvailable(symbol.to_string()));
    }
    Ok(raw)
}

fn parse_bar(symbol: &str, date: &str, fields: &Map<String, Value>) -> Result<RawBar, DataError> {
    let field = |names: &[&str]| -> Result<f64, DataError> {
        names
            .iter()
            .find_map(|name| fields.get(*name))
            .and_then(number)
            .ok_or_else(|| {
                DataError::Parse(format!("{} {}: missing or invalid '{}'", symbol, date, names[0]))
            })
    };

    Ok(RawBar {
        open: field(&["1. open", "1a. open (USD)"])?,
        high: field(&["2. high", "2a. high (USD)"])?,
        low: field(&["3. low", "3a. low (USD)"])?,
        close: field(&["4. close", "4a. close (USD)"])?,
        // Some crypto payloads omit volume; a present but bad value is an error
        volume: match fields.get("5. volume") {
            Some(value) => number(value).ok_or_else(|| {
                DataError::Parse(format!("{} {}: invalid '5. volume'", symbol, date))
            })?,
            None => 0.0,
        },
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn text(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}
