//! Indicator Property Tests
//!
//! Mathematical properties that must hold for any price series, checked
//! against randomly generated inputs.

use digest_core::traits::Indicator;
use digest_core::types::ObvTrend;
use digest_indicators::{adx, obv, obv_trend, rsi, sma, Rsi};
use proptest::prelude::*;

fn prices(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1_000.0, min_len..max_len)
}

/// Naive trailing mean used as the SMA oracle.
fn naive_mean(data: &[f64], period: usize) -> f64 {
    let window = &data[data.len() - period..];
    let mut total = 0.0;
    for value in window {
        total += value;
    }
    total / period as f64
}

proptest! {
    #[test]
    fn rsi_is_bounded(closes in prices(2, 300), period in 2usize..30) {
        for value in Rsi::new(period).calculate(&closes) {
            prop_assert!((0.0..=100.0).contains(&value), "rsi {} out of range", value);
        }
    }

    #[test]
    fn rsi_is_100_without_losses(start in 1.0f64..500.0, steps in prop::collection::vec(0.0f64..5.0, 15..100)) {
        let mut closes = vec![start];
        for step in steps {
            let last = *closes.last().unwrap();
            closes.push(last + step);
        }
        prop_assert_eq!(rsi(&closes, 14), Some(100.0));
    }

    #[test]
    fn sma_matches_naive_mean(data in prices(0, 260), period in 1usize..220) {
        match sma(&data, period) {
            None => prop_assert!(data.len() < period),
            Some(value) => {
                prop_assert!(data.len() >= period);
                let expected = naive_mean(&data, period);
                prop_assert!((value - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            }
        }
    }

    #[test]
    fn obv_monotonic_on_rising_closes(
        start in 1.0f64..500.0,
        steps in prop::collection::vec(0.01f64..5.0, 1..100),
        volume in 0.0f64..1e6,
    ) {
        let mut closes = vec![start];
        for step in &steps {
            let last = *closes.last().unwrap();
            closes.push(last + step);
        }
        let volumes = vec![volume; closes.len()];
        let series = obv(&closes, &volumes);
        for pair in series.windows(2) {
            prop_assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn obv_monotonic_on_falling_closes(
        start in 600.0f64..1_000.0,
        steps in prop::collection::vec(0.01f64..5.0, 1..100),
        volume in 0.0f64..1e6,
    ) {
        let mut closes = vec![start];
        for step in &steps {
            let last = *closes.last().unwrap();
            closes.push(last - step);
        }
        let volumes = vec![volume; closes.len()];
        let series = obv(&closes, &volumes);
        for pair in series.windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn obv_trend_is_defined_with_enough_values(values in prices(6, 50)) {
        prop_assert!(obv_trend(&values, 5).is_some());
    }

    #[test]
    fn adx_undefined_below_two_periods(closes in prices(1, 28)) {
        let highs: Vec<f64> = closes.iter().map(|c| c * 1.01).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c * 0.99).collect();
        prop_assert_eq!(adx(&highs, &lows, &closes, 14), None);
    }

    #[test]
    fn adx_is_bounded(closes in prices(28, 200)) {
        let highs: Vec<f64> = closes.iter().map(|c| c * 1.02).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c * 0.98).collect();
        if let Some(value) = adx(&highs, &lows, &closes, 14) {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&value));
        }
    }
}

#[test]
fn monotonic_ramp_has_rising_obv_and_strong_adx() {
    let closes: Vec<f64> = (0..210).map(|i| 100.0 + i as f64).collect();
    let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
    let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
    let volumes: Vec<f64> = (0..210).map(|i| 1_000.0 + i as f64 * 10.0).collect();

    let series = obv(&closes, &volumes);
    assert_eq!(obv_trend(&series, 5), Some(ObvTrend::Rising));
    assert!(adx(&highs, &lows, &closes, 14).unwrap() >= 25.0);
}
