// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

//! Factory functions for creating infrastructure clients.
//!
//! Centralizes dependency construction, making it easier to vary behavior
//! based on configuration without modifying business logic.

use crate::domain::traits::Archiver;
use crate::domain::traits::FileSelector;
use crate::domain::traits::UsageProbe;
use crate::infra::archiver::TarGzArchiver;
use crate::infra::file_selector::AgedFileSelector;
use crate::infra::priority::OsPriority;
use crate::infra::usage_probe::StatvfsProbe;

/// Creates the disk usage probe.
pub fn create_usage_probe() -> impl UsageProbe {
    StatvfsProbe
}

/// Creates a selector for aged files matching `file_pattern`.
pub fn create_file_selector(file_pattern: &str) -> anyhow::Result<impl FileSelector> {
    AgedFileSelector::new(file_pattern)
}

/// Creates the archiver; compression runs with OS priority hints applied.
pub fn create_archiver() -> impl Archiver {
    TarGzArchiver::new(OsPriority)
}
