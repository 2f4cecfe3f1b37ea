use std::path::Path;

use anyhow::Context;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::domain::config::ReclaimRules;
use crate::domain::models::ArchiveOutcome;
use crate::domain::models::DirectoryReport;
use crate::domain::models::IterationReport;
use crate::domain::models::LoopState;
use crate::domain::paths;
use crate::domain::traits::Archiver;
use crate::domain::traits::FileSelector;
use crate::domain::traits::UsageProbe;
use crate::Metrics;

/// Reclamation loop orchestrator.
///
/// Every iteration starts from a fresh usage reading:
/// 1. Below threshold: nothing happens (Idle)
/// 2. At or above: each watched directory is scanned for aged files, which
///    are bundled into one archive per directory (Reclaiming)
/// 3. The loop then waits for the check interval or a shutdown signal
pub struct App {
    cfg: AppConfig,
    metrics: Option<Metrics>,
    pub rules: ReclaimRules,
}

impl App {
    pub fn new(cfg: AppConfig, metrics: Option<Metrics>) -> Self {
        // Transform AppConfig into domain rules
        let rules = cfg.rules();
        App { cfg, metrics, rules }
    }

    /// Runs until `shutdown_rx` flips to `true`, or after one iteration with `--once`.
    /// Only a failed usage reading ends the loop with an error.
    pub async fn run(
        &self,
        probe: impl UsageProbe,
        selector: impl FileSelector,
        archiver: impl Archiver,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> anyhow::Result<()> {
        loop {
            let report = self.run_iteration(&probe, &selector, &archiver).await?;
            if let Some(metrics) = &self.metrics {
                metrics.report_iteration(&report);
            }

            if self.cfg.once || *shutdown_rx.borrow() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.cfg.check_interval) => {}
                // a dropped sender disables this branch, the sleep still completes
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::info!("Shutting down");
        Ok(())
    }

    pub async fn run_iteration(
        &self,
        probe: &impl UsageProbe,
        selector: &impl FileSelector,
        archiver: &impl Archiver,
    ) -> anyhow::Result<IterationReport> {
        let usage = probe
            .usage_percent(&self.cfg.disk_path)
            .context("Cannot decide on reclamation without a disk usage reading")?;
        tracing::info!(
            "Disk usage at {usage:.2}% (threshold {}%)",
            self.rules.threshold_percent
        );

        if usage < self.rules.threshold_percent {
            return Ok(IterationReport::idle(usage));
        }

        tracing::info!("Threshold exceeded! Starting compression...");
        let mut directories = Vec::with_capacity(self.cfg.log_directories.len());
        for dir in &self.cfg.log_directories {
            directories.push(self.reclaim_directory(dir, selector, archiver).await);
        }

        let report =
            IterationReport { usage_percent: usage, state: LoopState::Reclaiming, directories };
        tracing::debug!(
            candidates = report.directories.iter().map(|d| d.candidates).sum::<usize>(),
            archives = report.archives_created(),
            failures = report.directories.iter().filter(|d| d.outcome.is_failed()).count(),
            saved_bytes = report.saved_bytes(),
            "Reclamation pass finished"
        );
        Ok(report)
    }

    async fn reclaim_directory(
        &self,
        dir: &Path,
        selector: &impl FileSelector,
        archiver: &impl Archiver,
    ) -> DirectoryReport {
        let aged = selector.select(dir, self.rules.min_days_old);
        if aged.is_empty() {
            tracing::info!("No old logs found in {}", dir.display());
            return DirectoryReport {
                directory: dir.to_path_buf(),
                candidates: 0,
                outcome: ArchiveOutcome::Empty,
            };
        }

        let candidates = aged.len();
        tracing::info!("Found {candidates} old log files in {}", dir.display());

        let destination = paths::archive_dir_for(&self.cfg.archive_root, dir);
        let outcome =
            archiver.archive(aged, &destination, self.cfg.dry_run, self.rules.priority).await;

        match &outcome {
            ArchiveOutcome::DryRun { archive_path, file_count } => {
                tracing::info!(
                    "[DRY-RUN] Would archive {file_count} files from {} into {} (nice {}, ionice class {})",
                    dir.display(),
                    archive_path.display(),
                    self.rules.priority.nice_level,
                    self.rules.priority.ionice_class,
                );
            }
            ArchiveOutcome::Created(summary) => {
                let saved = summary.before_bytes as i64 - summary.after_bytes as i64;
                tracing::info!(
                    "Compressed {} files: {} → {} (Saved {})",
                    summary.files.len(),
                    paths::format_mib(summary.before_bytes as i64),
                    paths::format_mib(summary.after_bytes as i64),
                    paths::format_mib(saved),
                );
                if !summary.not_removed.is_empty() {
                    tracing::warn!(
                        archive = %summary.archive_path.display(),
                        "{} archived files could not be removed",
                        summary.not_removed.len()
                    );
                }
            }
            ArchiveOutcome::Failed { archive_path, before_bytes, error } => {
                tracing::error!(
                    dir = %dir.display(),
                    archive = %archive_path.display(),
                    kept = %paths::format_mib(*before_bytes as i64),
                    error = %error,
                    "Compression failed, original files were kept"
                );
            }
            ArchiveOutcome::Empty => {
                tracing::info!("Old logs in {} disappeared before archiving", dir.display());
            }
        }

        DirectoryReport { directory: dir.to_path_buf(), candidates, outcome }
    }
}
