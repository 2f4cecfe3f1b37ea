use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::PriorityHints;
use crate::domain::models::ArchiveOutcome;
use crate::domain::models::ProbeError;

pub trait UsageProbe {
    /// Utilization of the filesystem holding `path`, in percent, rounded to 2 decimals.
    fn usage_percent(&self, path: &Path) -> Result<f64, ProbeError>;
}

pub trait FileSelector {
    /// Regular files under `directory` (recursively) that match the pattern and are
    /// strictly older than `min_days_old` days. A missing directory yields an empty list.
    fn select(&self, directory: &Path, min_days_old: u64) -> Vec<PathBuf>;
}

pub trait PriorityControl {
    /// Lowers CPU and I/O priority of the calling thread. Best effort.
    fn apply_low_priority(&self, hints: &PriorityHints) -> anyhow::Result<()>;
}

#[async_trait]
pub trait Archiver {
    /// Bundles `files` into one timestamped `.tar.gz` under `destination_dir` and
    /// removes the originals once the archive is finalized.
    async fn archive(
        &self,
        files: Vec<PathBuf>,
        destination_dir: &Path,
        dry_run: bool,
        hints: PriorityHints,
    ) -> ArchiveOutcome;
}
