// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::config::PriorityHints;
use crate::domain::models::ArchiveError;
use crate::domain::models::ArchiveOutcome;
use crate::domain::models::ArchiveSummary;
use crate::domain::traits::Archiver;

/// Archiver double that records requests and reports a canned result.
///
/// Created archives report `before_bytes = 1 MiB per file` and a tenth of that after.
#[allow(unused)]
#[derive(Clone, Default)]
pub struct MockArchiver {
    calls: Arc<Mutex<Vec<(Vec<PathBuf>, PathBuf, bool)>>>,
    fail: bool,
}

#[allow(unused)]
pub const MOCK_BYTES_PER_FILE: u64 = 1024 * 1024;

impl MockArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn failing() -> Self {
        MockArchiver { fail: true, ..Self::default() }
    }

    #[cfg(test)]
    pub fn calls(&self) -> Vec<(Vec<PathBuf>, PathBuf, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Archiver for MockArchiver {
    async fn archive(
        &self,
        files: Vec<PathBuf>,
        destination_dir: &Path,
        dry_run: bool,
        _hints: PriorityHints,
    ) -> ArchiveOutcome {
        self.calls.lock().unwrap().push((files.clone(), destination_dir.to_path_buf(), dry_run));
        if files.is_empty() {
            return ArchiveOutcome::Empty;
        }
        let archive_path = destination_dir.join("logs-20250101-000000.tar.gz");
        if dry_run {
            return ArchiveOutcome::DryRun { archive_path, file_count: files.len() };
        }
        let before_bytes = files.len() as u64 * MOCK_BYTES_PER_FILE;
        if self.fail {
            return ArchiveOutcome::Failed {
                archive_path,
                before_bytes,
                error: ArchiveError::Worker("simulated failure".to_string()),
            };
        }
        ArchiveOutcome::Created(ArchiveSummary {
            archive_path,
            files,
            before_bytes,
            after_bytes: before_bytes / 10,
            not_removed: vec![],
        })
    }
}
