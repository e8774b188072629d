//! Series preprocessing: ordering, validation and truncation.

use chrono::NaiveDate;
use digest_core::error::SeriesError;
use digest_core::types::{PriceBar, PriceSeries, RawSeries};

/// Aligned arrays of a prepared series, oldest to newest.
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub series: PriceSeries,
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl Preprocessed {
    #[inline]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

/// Orders provider data and enforces the engine's length limits.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    min_bars: usize,
    max_bars: usize,
}

impl Preprocessor {
    /// Create a preprocessor keeping at most `max_bars` of at least `min_bars`.
    pub fn new(min_bars: usize, max_bars: usize) -> Self {
        assert!(min_bars > 0, "min_bars must be greater than 0");
        assert!(max_bars >= min_bars, "max_bars must be at least min_bars");
        Self { min_bars, max_bars }
    }

    pub fn min_bars(&self) -> usize {
        self.min_bars
    }

    pub fn max_bars(&self) -> usize {
        self.max_bars
    }

    /// Build an ordered series from an unordered date-keyed provider map.
    ///
    /// Dates must be `YYYY-MM-DD`; two keys naming the same day are rejected.
    pub fn from_raw(&self, symbol: &str, raw: &RawSeries) -> Result<PriceSeries, SeriesError> {
        let mut bars = Vec::with_capacity(raw.len());
        for (date_str, fields) in raw {
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                SeriesError::InvalidSeries(format!("unparseable date '{}': {}", date_str, e))
            })?;
            bars.push(PriceBar::new(
                date,
                fields.open,
                fields.high,
                fields.low,
                fields.close,
                fields.volume,
            ));
        }
        bars.sort_by_key(|b| b.date);

        // PriceSeries rejects duplicate dates along with bad prices
        PriceSeries::new(symbol, bars)
    }

    /// Check length and keep the most recent `max_bars`.
    pub fn prepare(&self, series: &PriceSeries) -> Result<Preprocessed, SeriesError> {
        if series.len() < self.min_bars {
            return Err(SeriesError::InsufficientData {
                required: self.min_bars,
                available: series.len(),
            });
        }

        let series = series.tail(self.max_bars);
        Ok(Preprocessed {
            closes: series.closes(),
            highs: series.highs(),
            lows: series.lows(),
            volumes: series.volumes(),
            series,
        })
    }

    /// `from_raw` followed by `prepare`.
    pub fn process(&self, symbol: &str, raw: &RawSeries) -> Result<Preprocessed, SeriesError> {
        let series = self.from_raw(symbol, raw)?;
        self.prepare(&series)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(50, 205)
    }
}
