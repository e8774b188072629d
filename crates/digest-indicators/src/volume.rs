//! Volume flow indicators.

use digest_core::types::ObvTrend;

/// On-Balance Volume (OBV).
///
/// Running total of volume, added on up-closes and subtracted on down-closes.
/// Takes closes and volumes, so it does not fit the single-input
/// [`digest_core::traits::Indicator`] trait.
#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }

    /// Calculate the OBV series. Inputs are truncated to the shorter length.
    pub fn calculate(&self, closes: &[f64], volumes: &[f64]) -> Vec<f64> {
        let len = closes.len().min(volumes.len());
        if len == 0 {
            return vec![];
        }

        let mut result = Vec::with_capacity(len);
        let mut total = volumes[0];
        result.push(total);

        for i in 1..len {
            if closes[i] > closes[i - 1] {
                total += volumes[i];
            } else if closes[i] < closes[i - 1] {
                total -= volumes[i];
            }
            result.push(total);
        }

        result
    }
}

/// OBV series for aligned closes and volumes.
pub fn obv(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    Obv::new().calculate(closes, volumes)
}

/// Classify the direction of the last `lookback + 1` OBV values.
///
/// `Rising` when at least 60% of the day-over-day comparisons are increases,
/// `Falling` when at least 60% are decreases, otherwise `Flat`.
pub fn obv_trend(obv: &[f64], lookback: usize) -> Option<ObvTrend> {
    if lookback == 0 || obv.len() < lookback + 1 {
        return None;
    }

    let window = &obv[obv.len() - lookback - 1..];
    let (mut increases, mut decreases) = (0usize, 0usize);
    for pair in window.windows(2) {
        if pair[1] > pair[0] {
            increases += 1;
        } else if pair[1] < pair[0] {
            decreases += 1;
        }
    }

    // 60% threshold in integer form
    let trend = if increases * 10 >= lookback * 6 {
        ObvTrend::Rising
    } else if decreases * 10 >= lookback * 6 {
        ObvTrend::Falling
    } else {
        ObvTrend::Flat
    };
    Some(trend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obv_accumulates() {
        let closes = vec![10.0, 11.0, 10.5, 10.5, 12.0];
        let volumes = vec![100.0, 200.0, 50.0, 75.0, 300.0];

        assert_eq!(obv(&closes, &volumes), vec![100.0, 300.0, 250.0, 250.0, 550.0]);
    }

    #[test]
    fn test_obv_empty() {
        assert!(obv(&[], &[]).is_empty());
    }

    #[test]
    fn test_obv_trend_rising() {
        // 3 of 5 comparisons up
        let values = vec![1.0, 2.0, 3.0, 3.0, 4.0, 3.5];
        assert_eq!(obv_trend(&values, 5), Some(ObvTrend::Rising));
    }

    #[test]
    fn test_obv_trend_falling() {
        let values = vec![10.0, 9.0, 8.0, 8.5, 7.0, 7.0];
        assert_eq!(obv_trend(&values, 5), Some(ObvTrend::Falling));
    }

    #[test]
    fn test_obv_trend_flat() {
        assert_eq!(obv_trend(&[5.0; 6], 5), Some(ObvTrend::Flat));
        // 2 up, 2 down, 1 unchanged
        let values = vec![1.0, 2.0, 1.0, 2.0, 1.0, 1.0];
        assert_eq!(obv_trend(&values, 5), Some(ObvTrend::Flat));
    }

    #[test]
    fn test_obv_trend_uses_only_recent_window() {
        // Long decline followed by five straight rises
        let mut values: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        values.extend((1..=5).map(|i| 81.0 + i as f64));
        assert_eq!(obv_trend(&values, 5), Some(ObvTrend::Rising));
    }

    #[test]
    fn test_obv_trend_insufficient_data() {
        assert_eq!(obv_trend(&[1.0, 2.0, 3.0], 5), None);
    }
}
