//! Validate configuration command.

use anyhow::Result;
use digest_config::{AppConfig, ConfigError};
use digest_core::types::AssetClass;
use digest_data::mask_key;
use std::path::Path;

pub async fn run(config_path: &Path, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let keys = config.gateway.resolve_api_keys();
    let masked: Vec<String> = keys.iter().map(|k| mask_key(k)).collect();
    let engine = &config.engine;
    let assets = config.watchlist.assets();

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {} ({})", config.logging.level, config.logging.format);
    println!("Provider: {}", config.gateway.base_url);
    println!("API keys: {} [{}]", keys.len(), masked.join(", "));
    println!(
        "Pacing: {} req/min, {} in flight, {} retries",
        config.gateway.requests_per_minute,
        config.gateway.max_concurrent_requests,
        config.gateway.max_retries
    );
    println!("Fallback: {:?}", config.gateway.fallback);
    println!(
        "Engine: {} (fallback {}), RSI {}, ADX {}, bars {}..{}",
        engine.canonical_windows(),
        engine
            .fallback_sma
            .map(|w| w.to_string())
            .unwrap_or_else(|| "none".to_string()),
        engine.rsi_period,
        engine.adx_period,
        engine.min_bars,
        engine.max_bars
    );
    println!(
        "Watchlist: {} equities, {} crypto",
        assets.iter().filter(|a| a.class == AssetClass::Equity).count(),
        assets.iter().filter(|a| a.class == AssetClass::Crypto).count()
    );
    println!("Subscribers: {}", config.subscribers.len());
    println!("Outbox: {}", config.digest.outbox_dir.display());

    if keys.is_empty() {
        println!();
        println!(
            "Warning: no API keys configured; set {} or gateway.api_keys",
            config.gateway.api_keys_env
        );
    }

    Ok(())
}
