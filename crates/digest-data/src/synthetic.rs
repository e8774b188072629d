//! Deterministic stand-in data.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use digest_core::error::DataError;
use digest_core::traits::MarketDataSource;
use digest_core::types::{Asset, AssetClass, RawBar, RawSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generates a random-walk daily series seeded from the symbol.
///
/// The same symbol and end date always give the same series. Equities get
/// weekday bars only; crypto trades every day.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    bars: usize,
    end: Option<NaiveDate>,
}

impl SyntheticSource {
    pub fn new(bars: usize) -> Self {
        Self { bars, end: None }
    }

    /// Pin the last bar's date instead of using today.
    pub fn ending_on(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Generate the series directly.
    pub fn generate(&self, asset: &Asset) -> RawSeries {
        let mut rng = StdRng::seed_from_u64(seed(&asset.symbol));
        let dates = trading_days(
            self.end.unwrap_or_else(|| Utc::now().date_naive()),
            self.bars,
            asset.class,
        );

        let mut close: f64 = rng.gen_range(20.0..500.0);
        let drift: f64 = rng.gen_range(-0.0005..0.001);
        let mut raw = RawSeries::with_capacity(dates.len());

        for date in dates {
            let open = close;
            close = (open * (1.0 + drift + rng.gen_range(-0.02..0.02))).max(0.01);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(100_000.0..5_000_000.0_f64).round();

            raw.insert(
                date.format("%Y-%m-%d").to_string(),
                RawBar {
                    open,
                    high,
                    low,
                    close,
                    volume,
                },
            );
        }

        raw
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(260)
    }
}

#[async_trait]
impl MarketDataSource for SyntheticSource {
    async fn daily_series(&self, asset: &Asset) -> Result<RawSeries, DataError> {
        Ok(self.generate(asset))
    }

    fn is_synthetic(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// FNV-1a over the symbol bytes; stable across runs and platforms.
fn seed(symbol: &str) -> u64 {
    symbol
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

/// The last `count` trading days up to and including `end`, oldest first.
fn trading_days(end: NaiveDate, count: usize, class: AssetClass) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = end;
    while days.len() < count {
        let weekend = matches!(day.weekday(), Weekday::Sat | Weekday::Sun);
        if class == AssetClass::Crypto || !weekend {
            days.push(day);
        }
        day -= Duration::days(1);
    }
    days.reverse();
    days
}
