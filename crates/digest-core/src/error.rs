//! Error types for the market digest.

use thiserror::Error;

/// Top-level digest error.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating or preparing a price series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

/// Signal engine errors.
///
/// Every variant is recoverable per asset: the batch job logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid series: {0}")]
    InvalidSeries(String),

    #[error("Indeterminate signal for {symbol}: missing {}", missing.join(", "))]
    Indeterminate { symbol: String, missing: Vec<String> },
}

impl EngineError {
    /// Whether the error points at bad provider data rather than a short history.
    pub fn is_data_quality(&self) -> bool {
        matches!(self, EngineError::InvalidSeries(_))
    }

    /// Short machine-friendly reason used in logs and the digest's skipped list.
    pub fn reason(&self) -> &'static str {
        match self {
            EngineError::InsufficientData { .. } => "insufficient_data",
            EngineError::InvalidSeries(_) => "invalid_series",
            EngineError::Indeterminate { .. } => "indeterminate",
        }
    }
}

impl From<SeriesError> for EngineError {
    fn from(err: SeriesError) -> Self {
        match err {
            SeriesError::InsufficientData {
                required,
                available,
            } => EngineError::InsufficientData {
                required,
                available,
            },
            SeriesError::InvalidSeries(reason) => EngineError::InvalidSeries(reason),
        }
    }
}

/// Indicator and engine parameter errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Market data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data available for {0}")]
    NoDataAvailable(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    /// Parsed bars that do not form a valid series.
    #[error(transparent)]
    Series(#[from] SeriesError),
}

impl DataError {
    /// Whether a retry (possibly with another credential) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DataError::RateLimited(_) | DataError::Http(_))
    }

    /// Whether the data arrived but failed series validation.
    pub fn is_data_quality(&self) -> bool {
        matches!(self, DataError::Series(SeriesError::InvalidSeries(_)))
    }
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
