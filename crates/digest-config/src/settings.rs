//! Configuration structures.

use digest_core::error::DigestError;
use digest_core::traits::Recipient;
use digest_core::types::{Asset, AssetClass};
use digest_data::{AlphaVantageConfig, Fallback, OutputSize, DEFAULT_BASE_URL};
use digest_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub watchlist: WatchlistSettings,
    #[serde(default)]
    pub digest: DigestSettings,
    #[serde(default)]
    pub subscribers: Vec<SubscriberSettings>,
}

impl AppConfig {
    /// Check everything a run depends on.
    pub fn validate(&self) -> Result<(), DigestError> {
        self.logging.validate()?;
        self.gateway.validate()?;
        self.engine
            .validate()
            .map_err(|e| DigestError::Config(format!("engine: {}", e)))?;

        if self.watchlist.assets().is_empty() {
            return Err(DigestError::Config("watchlist is empty".into()));
        }
        for subscriber in &self.subscribers {
            subscriber
                .recipient()
                .validate()
                .map_err(|e| DigestError::Config(format!("subscribers: {}", e)))?;
        }
        if self.digest.subject.trim().is_empty() {
            return Err(DigestError::Config("digest.subject must not be empty".into()));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "market-digest".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily rolling log files
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    fn validate(&self) -> Result<(), DigestError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(DigestError::Config(format!(
                "logging.level '{}' is not one of {}",
                self.level,
                LEVELS.join(", ")
            )));
        }
        if !matches!(self.format.to_lowercase().as_str(), "pretty" | "json") {
            return Err(DigestError::Config(format!(
                "logging.format '{}' must be 'pretty' or 'json'",
                self.format
            )));
        }
        Ok(())
    }
}

/// Market data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub base_url: String,
    /// Keys listed directly in the file or via `DIGEST__GATEWAY__API_KEYS`
    pub api_keys: Vec<String>,
    /// Environment variable holding extra comma-separated keys
    pub api_keys_env: String,
    pub requests_per_minute: u32,
    pub max_concurrent_requests: usize,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub backoff_min_ms: u64,
    pub backoff_max_ms: u64,
    pub outputsize: OutputSize,
    pub fallback: Fallback,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_keys: Vec::new(),
            api_keys_env: "ALPHAVANTAGE_API_KEY".to_string(),
            requests_per_minute: 5,
            max_concurrent_requests: 2,
            timeout_secs: 10,
            max_retries: 3,
            backoff_min_ms: 1_000,
            backoff_max_ms: 60_000,
            outputsize: OutputSize::Full,
            fallback: Fallback::None,
        }
    }
}

impl GatewaySettings {
    /// Configured keys followed by those from `api_keys_env`, deduplicated.
    pub fn resolve_api_keys(&self) -> Vec<String> {
        let from_env = std::env::var(&self.api_keys_env).unwrap_or_default();
        let mut seen = HashSet::new();
        self.api_keys
            .iter()
            .map(String::as_str)
            .chain(from_env.split(','))
            .map(str::trim)
            .filter(|k| !k.is_empty() && seen.insert(k.to_string()))
            .map(str::to_string)
            .collect()
    }

    /// Client settings for the provider.
    pub fn alpha_vantage_config(&self) -> AlphaVantageConfig {
        AlphaVantageConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            backoff_min: Duration::from_millis(self.backoff_min_ms),
            backoff_max: Duration::from_millis(self.backoff_max_ms),
            outputsize: self.outputsize,
            requests_per_minute: self.requests_per_minute,
        }
    }

    fn validate(&self) -> Result<(), DigestError> {
        if self.base_url.trim().is_empty() {
            return Err(DigestError::Config("gateway.base_url must not be empty".into()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(DigestError::Config(
                "gateway.max_concurrent_requests must be greater than 0".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(DigestError::Config("gateway.timeout_secs must be greater than 0".into()));
        }
        if self.backoff_min_ms > self.backoff_max_ms {
            return Err(DigestError::Config(
                "gateway.backoff_min_ms must not exceed backoff_max_ms".into(),
            ));
        }
        Ok(())
    }
}

/// A watchlist symbol with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

impl WatchlistEntry {
    pub fn new(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

/// Assets evaluated on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchlistSettings {
    pub equities: Vec<WatchlistEntry>,
    pub crypto: Vec<WatchlistEntry>,
}

impl Default for WatchlistSettings {
    fn default() -> Self {
        let equities = [
            ("AAPL", "Apple"),
            ("MSFT", "Microsoft"),
            ("NVDA", "NVIDIA"),
            ("AMZN", "Amazon"),
            ("META", "Meta Platforms"),
            ("GOOGL", "Alphabet"),
            ("TSLA", "Tesla"),
            ("BRK.B", "Berkshire Hathaway"),
            ("LLY", "Eli Lilly"),
            ("AVGO", "Broadcom"),
        ];
        let crypto = [("BTC", "Bitcoin"), ("ETH", "Ethereum")];
        Self {
            equities: equities.iter().map(|(s, n)| WatchlistEntry::new(s, n)).collect(),
            crypto: crypto.iter().map(|(s, n)| WatchlistEntry::new(s, n)).collect(),
        }
    }
}

impl WatchlistSettings {
    /// Every asset once, equities first, in configured order.
    pub fn assets(&self) -> Vec<Asset> {
        let mut seen = HashSet::new();
        let equities = self
            .equities
            .iter()
            .map(|e| Asset::equity(e.symbol.trim().to_uppercase(), e.name.clone()));
        let crypto = self
            .crypto
            .iter()
            .map(|e| Asset::crypto(e.symbol.trim().to_uppercase(), e.name.clone()));

        equities
            .chain(crypto)
            .filter(|a| !a.symbol.is_empty() && seen.insert((a.symbol.clone(), a.class)))
            .collect()
    }
}

/// Digest rendering and delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    /// Where the outbox notifier writes rendered digests
    pub outbox_dir: PathBuf,
    pub subject: String,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            outbox_dir: PathBuf::from("outbox"),
            subject: "Daily Market Digest".to_string(),
        }
    }
}

/// One digest subscriber and their preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberSettings {
    pub email: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default = "default_true")]
    pub include_equities: bool,
    #[serde(default = "default_true")]
    pub include_crypto: bool,
}

fn default_true() -> bool {
    true
}

impl SubscriberSettings {
    pub fn recipient(&self) -> Recipient {
        Recipient {
            email: self.email.trim().to_string(),
            topics: self.topics.clone(),
        }
    }

    /// Whether this subscriber's digest includes the asset class.
    pub fn wants(&self, class: AssetClass) -> bool {
        match class {
            AssetClass::Equity => self.include_equities,
            AssetClass::Crypto => self.include_crypto,
        }
    }
}
