// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use crate::domain::traits::FileSelector;

/// Mock file selector for testing without filesystem I/O.
///
/// Allows pre-populating aged files per directory and tracking calls.
#[allow(unused)]
#[derive(Clone)]
pub struct MockFileSelector {
    files: BTreeMap<PathBuf, Vec<PathBuf>>,
    select_calls: Arc<Mutex<Vec<(PathBuf, u64)>>>,
}

impl MockFileSelector {
    pub fn new() -> Self {
        MockFileSelector { files: BTreeMap::new(), select_calls: Arc::new(Mutex::new(Vec::new())) }
    }

    #[cfg(test)]
    pub fn with_files(mut self, directory: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        self.files.insert(directory.into(), files);
        self
    }

    #[cfg(test)]
    pub fn select_calls(&self) -> Vec<(PathBuf, u64)> {
        self.select_calls.lock().unwrap().clone()
    }
}

impl Default for MockFileSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSelector for MockFileSelector {
    fn select(&self, directory: &Path, min_days_old: u64) -> Vec<PathBuf> {
        self.select_calls.lock().unwrap().push((directory.to_path_buf(), min_days_old));
        self.files.get(directory).cloned().unwrap_or_default()
    }
}
