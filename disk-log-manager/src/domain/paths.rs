// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::TimeZone;

/// Constructs an archive filename from its creation time: `logs-YYYYMMDD-HHMMSS.tar.gz`.
pub fn archive_file_name<Tz: TimeZone>(created_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    created_at.format("logs-%Y%m%d-%H%M%S.tar.gz").to_string()
}

/// Archive subdirectory for a watched directory: `<archive_root>/<basename>`.
///
/// Trailing separators are ignored. A directory without a basename (`/`, `.`)
/// maps to the archive root itself. Two watched directories sharing a basename
/// share a subdirectory.
pub fn archive_dir_for(archive_root: &Path, watched_dir: &Path) -> PathBuf {
    match watched_dir.file_name() {
        Some(name) => archive_root.join(name),
        None => archive_root.to_path_buf(),
    }
}

/// Name of a source file inside the archive.
/// Drops root, prefix, `.` and `..` components, the way `tar` strips leading `/`.
pub fn entry_name(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Appends `.part` to the archive path for the in-progress file.
pub fn partial_path(archive_path: &Path) -> PathBuf {
    let mut tmp = archive_path.as_os_str().to_os_string();
    tmp.push(".part");
    PathBuf::from(tmp)
}

/// Bytes to MiB with two decimals, as printed in size summaries.
pub fn format_mib(bytes: i64) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}
