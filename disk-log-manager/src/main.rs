// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//
mod app;
mod domain;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;

use crate::app::metrics::Metrics;
use crate::app::pipeline::App;
use crate::cli::Args;
use crate::config::AppConfig;
use crate::infra::factory::create_archiver;
use crate::infra::factory::create_file_selector;
use crate::infra::factory::create_usage_probe;
use crate::infra::logging::init_tracing;
use crate::infra::telemetry::init_meter_provider;

mod cli;
mod config;
mod infra;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(&args.log_file)?;

    let cfg = match AppConfig::load(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(error = %err, "Invalid configuration");
            anyhow::bail!(err);
        }
    };
    tracing::info!("Starting disk log manager with config: {cfg}");
    if cfg.dry_run {
        tracing::info!("[DRY-RUN] No files will be compressed or deleted");
    }
    for (archive_dir, dirs) in cfg.shared_archive_dirs() {
        tracing::warn!(
            archive_dir = %archive_dir.display(),
            "Watched directories {dirs:?} share one archive directory"
        );
    }

    let meter_provider = if args.metrics { Some(init_meter_provider()?) } else { None };
    let metrics = meter_provider.as_ref().map(|provider| {
        opentelemetry::global::set_meter_provider(provider.clone());
        Metrics::new(&opentelemetry::global::meter("dlm_meter"))
    });

    // Initialize dependencies
    let probe = create_usage_probe();
    let selector = create_file_selector(&cfg.rules().file_pattern)?;
    let archiver = create_archiver();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = shutdown_signal().await {
            tracing::error!(error = %err, "Failed to listen for shutdown signals");
            return;
        }
        tracing::info!("Shutdown signal received, stopping after the current iteration");
        let _ = shutdown_tx.send(true);
    });

    let app = App::new(cfg, metrics);
    let result = app.run(probe, selector, archiver, shutdown_rx).await;

    if let Some(provider) = meter_provider {
        if let Err(err) = provider.shutdown() {
            tracing::warn!(error = %err, "Failed to flush metrics");
        }
    }
    if let Err(err) = result {
        tracing::error!(error = ?err, "Application failed");
        anyhow::bail!(err);
    }
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> anyhow::Result<()> {
    use tokio::signal::unix::signal;
    use tokio::signal::unix::SignalKind;

    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.context("Failed to listen for SIGINT"),
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")
}
