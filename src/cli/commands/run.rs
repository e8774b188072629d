//! Batch digest command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use digest_config::{AppConfig, ConfigError, GatewaySettings};
use digest_core::traits::{MarketDataSource, Notifier};
use digest_core::types::{Asset, Evaluation};
use digest_data::{AlphaVantageSource, CredentialPool, Fallback, MarketGateway, SyntheticSource};
use digest_engine::SignalEngine;
use digest_report::{
    render_digest, DigestContext, DigestEntry, LogNotifier, OutboxNotifier, SkippedAsset,
};
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::cli::RunArgs;

pub async fn run(
    args: RunArgs,
    config_path: &Path,
    loaded: Result<AppConfig, ConfigError>,
) -> Result<()> {
    let config = loaded
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    config.validate().context("Invalid configuration")?;

    let run_id = Uuid::new_v4();
    execute(args, config)
        .instrument(info_span!("digest_run", run_id = %run_id))
        .await
}

async fn execute(args: RunArgs, config: AppConfig) -> Result<()> {
    let engine = Arc::new(
        SignalEngine::new(config.engine.clone()).context("Invalid engine configuration")?,
    );
    let gateway = build_gateway(&config.gateway)?;
    let assets = config.watchlist.assets();
    let today = Utc::now().date_naive();

    info!(
        assets = assets.len(),
        provider = gateway.primary_name(),
        subscribers = config.subscribers.len(),
        dry_run = args.dry_run,
        "Starting digest run"
    );

    // Bounded fan-out; the gateway paces the requests themselves
    let outcomes: Vec<(Asset, Result<Evaluation, String>)> = stream::iter(assets)
        .map(|asset| {
            let gateway = &gateway;
            let engine = Arc::clone(&engine);
            async move {
                let outcome = evaluate_asset(gateway, &engine, &asset).await;
                (asset, outcome)
            }
        })
        .buffer_unordered(config.gateway.max_concurrent_requests)
        .collect()
        .await;

    let mut digest = DigestContext::new(today, config.digest.subject.clone());
    for (asset, outcome) in outcomes {
        match outcome {
            Ok(evaluation) => digest.entries.push(DigestEntry {
                name: asset.display_name().to_string(),
                class: asset.class,
                evaluation,
            }),
            Err(reason) => digest.skipped.push(SkippedAsset {
                name: asset.display_name().to_string(),
                symbol: asset.symbol,
                class: asset.class,
                reason,
            }),
        }
    }
    digest.skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    info!(
        evaluated = digest.entries.len(),
        skipped = digest.skipped.len(),
        "Evaluation finished"
    );

    if config.subscribers.is_empty() {
        warn!("No subscribers configured, nothing to deliver");
        return Ok(());
    }

    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(LogNotifier::new())
    } else {
        Box::new(OutboxNotifier::new(&config.digest.outbox_dir, today))
    };

    let mut delivered = 0usize;
    for subscriber in &config.subscribers {
        let recipient = subscriber.recipient();
        let view = digest.for_subscriber(&subscriber.topics, |class| subscriber.wants(class));
        let html = render_digest(&view);

        match notifier.deliver(&recipient, &config.digest.subject, &html).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!(
                recipient = %recipient.email,
                notifier = notifier.name(),
                error = %e,
                "Delivery failed"
            ),
        }
    }

    info!(
        delivered,
        failed = config.subscribers.len() - delivered,
        notifier = notifier.name(),
        "Digest run complete"
    );
    println!(
        "Evaluated {} assets ({} skipped), delivered {} of {} digests via {}",
        digest.entries.len(),
        digest.skipped.len(),
        delivered,
        config.subscribers.len(),
        notifier.name()
    );

    Ok(())
}

/// Fetch and classify one asset. Every failure becomes a skip reason.
async fn evaluate_asset(
    gateway: &MarketGateway,
    engine: &SignalEngine,
    asset: &Asset,
) -> Result<Evaluation, String> {
    let fetched = gateway.fetch(asset).await.map_err(|e| {
        warn!(symbol = %asset.symbol, error = %e, "Fetch failed, skipping asset");
        e.to_string()
    })?;

    engine
        .evaluate_raw(&asset.symbol, &fetched.series)
        .and_then(Evaluation::into_determinate)
        .map(|evaluation| evaluation.with_synthetic(fetched.synthetic))
        .map_err(|e| {
            warn!(
                symbol = %asset.symbol,
                reason = e.reason(),
                error = %e,
                "Evaluation failed, skipping asset"
            );
            e.to_string()
        })
}

fn build_gateway(settings: &GatewaySettings) -> Result<MarketGateway> {
    let keys = settings.resolve_api_keys();
    let synthetic_fallback = settings.fallback == Fallback::Synthetic;

    if keys.is_empty() {
        if synthetic_fallback {
            warn!("No API keys configured, every series will be synthetic");
            return Ok(MarketGateway::new(Arc::new(SyntheticSource::default())));
        }
        anyhow::bail!(
            "No API keys configured. Set {} or gateway.api_keys",
            settings.api_keys_env
        );
    }

    let pool = Arc::new(CredentialPool::new(keys)?);
    let primary: Arc<dyn MarketDataSource> = Arc::new(AlphaVantageSource::new(
        settings.alpha_vantage_config(),
        pool,
    )?);

    let gateway = MarketGateway::new(primary);
    Ok(if synthetic_fallback {
        gateway.with_fallback(Arc::new(SyntheticSource::default()))
    } else {
        gateway
    })
}
