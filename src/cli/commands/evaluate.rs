//! Evaluate command implementation.

use anyhow::{Context, Result};
use digest_config::AppConfig;
use digest_core::types::Evaluation;
use digest_data::load_csv;
use digest_engine::{EngineConfig, SignalEngine};
use tracing::{info, warn};

use crate::cli::{EvaluateArgs, OutputFormat};

pub async fn run(args: EvaluateArgs, config: Option<AppConfig>) -> Result<()> {
    let engine_config = match config {
        Some(config) => config.engine,
        None => {
            warn!("Configuration not loaded, using default engine settings");
            EngineConfig::default()
        }
    };
    let engine = SignalEngine::new(engine_config).context("Invalid engine configuration")?;

    if !args.data.exists() {
        anyhow::bail!(
            "Data file '{}' does not exist. Provide a CSV file with --data (e.g. --data ./data/AAPL.csv)",
            args.data.display()
        );
    }
    let symbol = args.symbol.clone().unwrap_or_else(|| {
        args.data
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "DATA".to_string())
    });

    let series = load_csv(&args.data, &symbol)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    info!(symbol = %symbol, bars = series.len(), "Evaluating series");

    let evaluation = engine
        .evaluate(&series)
        .with_context(|| format!("Failed to evaluate {}", symbol))?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        OutputFormat::Text => println!("{}", summary(&evaluation)),
    }

    Ok(())
}

fn summary(evaluation: &Evaluation) -> String {
    let ind = &evaluation.indicators;
    let value = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".into());
    let percent = |v: Option<f64>| v.map(|v| format!("{:+.2}%", v)).unwrap_or_else(|| "n/a".into());

    let mut lines = vec![
        format!("Symbol:     {}", evaluation.symbol),
        format!("As of:      {}", evaluation.as_of),
        format!("Price:      {:.2}", evaluation.price),
        format!(
            "SMA{}:      {} (slope {})",
            ind.sma_windows.short,
            value(ind.sma_short),
            percent(ind.slope_short)
        ),
        format!(
            "SMA{}:     {} (slope {})",
            ind.sma_windows.long,
            value(ind.sma_long),
            percent(ind.slope_long)
        ),
        format!("RSI:        {}", value(ind.rsi)),
        format!("ADX:        {}", value(ind.adx)),
        format!(
            "OBV:        {} (SMA {}, trend {})",
            value(ind.obv_current),
            value(ind.obv_sma),
            ind.obv_trend.map(|t| t.to_string()).unwrap_or_else(|| "n/a".into())
        ),
        format!("Bars used:  {}", ind.bars_used),
        format!("Signal:     {}", evaluation.signal()),
    ];
    lines.extend(
        evaluation
            .classification
            .rationale
            .iter()
            .map(|r| format!("  - {}", r)),
    );
    lines.join("\n")
}
