//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, DigestSettings, GatewaySettings, LoggingConfig, SubscriberSettings,
    WatchlistEntry, WatchlistSettings,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Prefix of environment overrides, e.g. `DIGEST__GATEWAY__MAX_RETRIES`.
pub const ENV_PREFIX: &str = "DIGEST";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("gateway.api_keys")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Parse configuration from a TOML string, without environment overrides.
pub fn parse_config(toml_str: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(toml_str)
}
