//! Classifier Property Tests
//!
//! Invariants of the rule cascade over randomly generated indicator values.

use digest_core::types::{missing_inputs, ObvTrend, Signal, SmaWindows};
use digest_engine::{ClassifierInput, ClassifierThresholds, SignalClassifier};
use proptest::prelude::*;

fn obv_trend() -> impl Strategy<Value = Option<ObvTrend>> {
    prop_oneof![
        Just(None),
        Just(Some(ObvTrend::Rising)),
        Just(Some(ObvTrend::Falling)),
        Just(Some(ObvTrend::Flat)),
    ]
}

prop_compose! {
    fn complete_input()(
        price in 1.0f64..1_000.0,
        sma_short in 1.0f64..1_000.0,
        sma_long in 1.0f64..1_000.0,
        rsi in 0.0f64..=100.0,
        adx in prop::option::of(0.0f64..=100.0),
        obv_trend in obv_trend(),
    ) -> ClassifierInput {
        ClassifierInput {
            price,
            sma_short: Some(sma_short),
            sma_long: Some(sma_long),
            rsi: Some(rsi),
            adx,
            obv_trend,
            windows: SmaWindows::new(50, 200),
        }
    }
}

prop_compose! {
    fn valid_thresholds()(
        adx in 0.0f64..=100.0,
        extra in 0.0f64..=100.0,
        strong_rsi_below in 0.0f64..=100.0,
        buy_rsi_below in 0.0f64..=100.0,
        sell_rsi_above in 0.0f64..=100.0,
    ) -> ClassifierThresholds {
        ClassifierThresholds {
            strong_adx: (adx + extra).min(100.0),
            adx,
            strong_rsi_below,
            buy_rsi_below,
            sell_rsi_above,
        }
    }
}

proptest! {
    #[test]
    fn classification_is_deterministic(input in complete_input()) {
        let classifier = SignalClassifier::default();
        prop_assert_eq!(classifier.classify(&input), classifier.classify(&input));
    }

    #[test]
    fn complete_inputs_are_determinate(input in complete_input()) {
        let result = SignalClassifier::default().classify(&input);
        prop_assert!(result.signal.is_determinate());
        prop_assert!(!result.rationale.is_empty());
    }

    #[test]
    fn missing_required_input_is_indeterminate(
        input in complete_input(),
        drop_rsi in any::<bool>(),
        drop_short in any::<bool>(),
        drop_long in any::<bool>(),
    ) {
        prop_assume!(drop_rsi || drop_short || drop_long);
        let mut input = input;
        if drop_rsi { input.rsi = None; }
        if drop_short { input.sma_short = None; }
        if drop_long { input.sma_long = None; }

        let result = SignalClassifier::default().classify(&input);
        let missing = missing_inputs(input.rsi, input.sma_short, input.sma_long);
        prop_assert_eq!(result.signal, Signal::Indeterminate);
        prop_assert_eq!(result.rationale, vec![format!("missing {}", missing.join(", "))]);
    }

    #[test]
    fn missing_adx_always_holds(input in complete_input()) {
        let mut input = input;
        input.adx = None;
        prop_assert_eq!(SignalClassifier::default().classify(&input).signal, Signal::Hold);
    }

    #[test]
    fn strong_buy_implies_its_conditions(input in complete_input()) {
        let t = ClassifierThresholds::default();
        if SignalClassifier::new(t).classify(&input).signal == Signal::StrongBuy {
            let (short, long) = (input.sma_short.unwrap(), input.sma_long.unwrap());
            prop_assert!(input.price >= short && short > long);
            prop_assert!(input.adx.unwrap() >= t.strong_adx);
            prop_assert!(input.rsi.unwrap() < t.strong_rsi_below);
            prop_assert_eq!(input.obv_trend, Some(ObvTrend::Rising));
        }
    }

    #[test]
    fn sell_signals_need_price_below_long_average(input in complete_input()) {
        let signal = SignalClassifier::default().classify(&input).signal;
        if matches!(signal, Signal::Sell | Signal::StrongSell) {
            prop_assert!(input.price < input.sma_long.unwrap());
        }
    }

    #[test]
    fn ordered_thresholds_validate(thresholds in valid_thresholds()) {
        prop_assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn inverted_adx_thresholds_rejected(adx in 1.0f64..=100.0, gap in 0.001f64..1.0) {
        let thresholds = ClassifierThresholds {
            strong_adx: adx - gap,
            adx,
            ..Default::default()
        };
        prop_assert!(thresholds.validate().is_err());
    }
}
