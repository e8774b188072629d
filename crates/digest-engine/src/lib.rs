//! Series preprocessing and signal classification.
//!
//! The engine turns a raw daily series into an [`Evaluation`]:
//! - [`Preprocessor`] orders, validates and truncates the provider's bars
//! - [`SignalEngine`] computes the [`IndicatorSet`] with `digest-indicators`
//! - [`SignalClassifier`] maps indicators to a [`Signal`] via an ordered rule cascade
//!
//! Everything here is synchronous and free of shared mutable state, so one
//! engine can be shared across tasks.
//!
//! [`Evaluation`]: digest_core::types::Evaluation
//! [`IndicatorSet`]: digest_core::types::IndicatorSet
//! [`Signal`]: digest_core::types::Signal

mod classifier;
mod config;
mod engine;
mod preprocess;

pub use classifier::{ClassifierInput, ClassifierThresholds, SignalClassifier};
pub use config::EngineConfig;
pub use engine::SignalEngine;
pub use preprocess::{Preprocessed, Preprocessor};
