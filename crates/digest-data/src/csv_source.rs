//! CSV data source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use digest_core::error::DataError;
use digest_core::types::{PriceBar, PriceSeries};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Daily history stored in a CSV file.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    /// Open a CSV source; the file must exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file as an ordered series.
    pub fn load(&self, symbol: &str) -> Result<PriceSeries, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let mut bars = Vec::new();
        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
            bars.push(PriceBar::new(
                parse_date(&record.date)?,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        // Files are often newest-first
        bars.sort_by_key(|b| b.date);

        debug!(symbol = %symbol, path = %self.path.display(), bars = bars.len(), "Loaded CSV");
        Ok(PriceSeries::new(symbol, bars)?)
    }
}

/// Parse the date formats commonly found in exported daily data.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }

    // Unix timestamp, seconds or milliseconds
    if let Ok(ts) = date_str.parse::<i64>() {
        let millis = if ts > 10_000_000_000 {
            Some(ts)
        } else {
            ts.checked_mul(1000)
        };
        if let Some(dt) = millis.and_then(DateTime::from_timestamp_millis) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::Parse(format!("Could not parse date: {}", date_str)))
}

/// Load one CSV file as a series.
pub fn load_csv(path: impl AsRef<Path>, symbol: &str) -> Result<PriceSeries, DataError> {
    CsvSource::new(path)?.load(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::error::SeriesError;
    use std::io::Write;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("1705312800000").unwrap(), expected); // Unix ms
        assert_eq!(parse_date("1705312800").unwrap(), expected); // Unix sec
        assert!(parse_date("soon").is_err());
    }

    #[test]
    fn test_parse_date_out_of_range_timestamp() {
        assert!(parse_date("-9223372036854775807").is_err());
        assert!(parse_date("9223372036854775807").is_err());
    }

    #[test]
    fn test_load_sorts_and_accepts_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Adj Close,Volume").unwrap();
        writeln!(file, "2024-01-03,11,12,10,11.5,300").unwrap();
        writeln!(file, "2024-01-02,10,11,9,10.5,200").unwrap();
        writeln!(file, "2024-01-01,9,10,8,9.5,100").unwrap();

        let series = load_csv(file.path(), "TEST").unwrap();
        assert_eq!(series.symbol(), "TEST");
        assert_eq!(series.closes(), vec![9.5, 10.5, 11.5]);
    }

    #[test]
    fn test_missing_volume_defaults_to_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "date,open,high,low,close").unwrap();
        writeln!(file, "2024-01-01,9,10,8,9.5").unwrap();

        let series = load_csv(file.path(), "TEST").unwrap();
        assert_eq!(series.volumes(), vec![0.0]);
    }

    #[test]
    fn test_duplicate_dates_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        writeln!(file, "2024-01-01,9,10,8,9.5,100").unwrap();
        writeln!(file, "2024-01-01,9,10,8,9.6,100").unwrap();

        let err = load_csv(file.path(), "TEST").unwrap_err();
        assert!(matches!(err, DataError::Series(SeriesError::InvalidSeries(_))));
        assert!(err.is_data_quality());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvSource::new("/nonexistent/prices.csv"),
            Err(DataError::NoDataAvailable(_))
        ));
    }
}
