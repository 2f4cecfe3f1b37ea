// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::path::PathBuf;

use thiserror::Error;

/// Logical state of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Usage below threshold, nothing to do
    Idle,
    /// Usage at or above threshold, watched directories were processed
    Reclaiming,
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("disk path {path} is unavailable: {source}")]
    PathUnavailable { path: PathBuf, source: std::io::Error },
}

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to create archive directory {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },

    #[error("failed to write archive {path}: {source}")]
    Compress { path: PathBuf, source: std::io::Error },

    #[error("archiver worker failed: {0}")]
    Worker(String),
}

/// A finalized archive and the bookkeeping around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub archive_path: PathBuf,
    /// Source files stored in the archive
    pub files: Vec<PathBuf>,
    pub before_bytes: u64,
    pub after_bytes: u64,
    /// Sources that were archived but could not be deleted afterwards
    pub not_removed: Vec<PathBuf>,
}

/// Result of one archive request.
///
/// Compression failure is reported as a value, never as a panic or an `Err`,
/// so the caller decides how strict to be.
#[derive(Debug)]
pub enum ArchiveOutcome {
    /// Nothing to archive, no I/O was performed
    Empty,
    /// Dry-run: the archive that would have been written
    DryRun { archive_path: PathBuf, file_count: usize },
    Created(ArchiveSummary),
    /// Compression failed; source files were left in place
    Failed { archive_path: PathBuf, before_bytes: u64, error: ArchiveError },
}

impl ArchiveOutcome {
    /// `(before_bytes, after_bytes)`; zero for everything but a created archive.
    pub fn sizes(&self) -> (u64, u64) {
        match self {
            ArchiveOutcome::Created(summary) => (summary.before_bytes, summary.after_bytes),
            _ => (0, 0),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ArchiveOutcome::Failed { .. })
    }
}

/// What happened to a single watched directory during an iteration.
#[derive(Debug)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    pub candidates: usize,
    pub outcome: ArchiveOutcome,
}

#[derive(Debug)]
pub struct IterationReport {
    pub usage_percent: f64,
    pub state: LoopState,
    pub directories: Vec<DirectoryReport>,
}

impl IterationReport {
    pub fn idle(usage_percent: f64) -> Self {
        Self { usage_percent, state: LoopState::Idle, directories: Vec::new() }
    }

    pub fn archives_created(&self) -> usize {
        self.directories
            .iter()
            .filter(|d| matches!(d.outcome, ArchiveOutcome::Created(_)))
            .count()
    }

    /// Bytes freed across all archives of this iteration (may be negative for tiny inputs).
    pub fn saved_bytes(&self) -> i64 {
        self.directories
            .iter()
            .map(|d| {
                let (before, after) = d.outcome.sizes();
                before as i64 - after as i64
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created(before: u64, after: u64) -> ArchiveOutcome {
        ArchiveOutcome::Created(ArchiveSummary {
            archive_path: PathBuf::from("archives/app/logs-20250101-000000.tar.gz"),
            files: vec![PathBuf::from("/var/log/app/a.log")],
            before_bytes: before,
            after_bytes: after,
            not_removed: vec![],
        })
    }

    #[test]
    fn test_sizes_only_for_created() {
        assert_eq!(ArchiveOutcome::Empty.sizes(), (0, 0));
        assert_eq!(
            ArchiveOutcome::DryRun { archive_path: PathBuf::from("x"), file_count: 3 }.sizes(),
            (0, 0)
        );
        let failed = ArchiveOutcome::Failed {
            archive_path: PathBuf::from("x"),
            before_bytes: 100,
            error: ArchiveError::Worker("boom".into()),
        };
        assert_eq!(failed.sizes(), (0, 0));
        assert!(failed.is_failed());
        assert_eq!(created(1000, 100).sizes(), (1000, 100));
    }

    #[test]
    fn test_iteration_report_totals() {
        let report = IterationReport {
            usage_percent: 91.0,
            state: LoopState::Reclaiming,
            directories: vec![
                DirectoryReport {
                    directory: PathBuf::from("/a"),
                    candidates: 1,
                    outcome: created(1000, 100),
                },
                DirectoryReport {
                    directory: PathBuf::from("/b"),
                    candidates: 0,
                    outcome: ArchiveOutcome::Empty,
                },
                DirectoryReport {
                    directory: PathBuf::from("/c"),
                    candidates: 1,
                    outcome: created(10, 40),
                },
            ],
        };
        assert_eq!(report.archives_created(), 2);
        assert_eq!(report.saved_bytes(), 870);
        assert_eq!(IterationReport::idle(12.5).state, LoopState::Idle);
    }
}
