// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::Context;
use globset::Glob;
use globset::GlobMatcher;
use walkdir::WalkDir;

use crate::domain::selection::is_aged;
use crate::domain::traits::FileSelector;

/// Recursively walks a watched directory and picks aged files whose name matches a glob.
pub struct AgedFileSelector {
    matcher: GlobMatcher,
}

impl AgedFileSelector {
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let matcher = Glob::new(pattern)
            .with_context(|| format!("Invalid file pattern '{pattern}'"))?
            .compile_matcher();
        Ok(AgedFileSelector { matcher })
    }

    /// Same as [`FileSelector::select`] with an explicit "now".
    pub fn select_at(&self, directory: &Path, min_days_old: u64, now: SystemTime) -> Vec<PathBuf> {
        if !directory.exists() {
            return Vec::new();
        }

        let mut aged = Vec::new();
        for entry in WalkDir::new(directory) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(dir = %directory.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            // symlinks are not followed, so this is a real regular file
            if !entry.file_type().is_file() || !self.matcher.is_match(entry.file_name()) {
                continue;
            }
            let modified =
                entry.metadata().map_err(anyhow::Error::from).and_then(|m| Ok(m.modified()?));
            let modified = match modified {
                Ok(modified) => modified,
                Err(err) => {
                    tracing::warn!(file = %entry.path().display(), error = %err, "Cannot read mtime");
                    continue;
                }
            };
            if is_aged(modified, now, min_days_old) {
                aged.push(entry.into_path());
            }
        }
        aged
    }
}

impl FileSelector for AgedFileSelector {
    fn select(&self, directory: &Path, min_days_old: u64) -> Vec<PathBuf> {
        self.select_at(directory, min_days_old, SystemTime::now())
    }
}
