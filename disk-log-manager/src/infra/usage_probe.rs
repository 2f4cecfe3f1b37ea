// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//
use std::io;
use std::path::Path;

use crate::domain::models::ProbeError;
use crate::domain::traits::UsageProbe;

/// `used / total * 100`, rounded to 2 decimals. An empty filesystem reports 0.
pub fn usage_percent(total: u64, used: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = used as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

/// Reads filesystem statistics with `statvfs(3)`.
#[derive(Clone, Copy, Default)]
pub struct StatvfsProbe;

impl UsageProbe for StatvfsProbe {
    fn usage_percent(&self, path: &Path) -> Result<f64, ProbeError> {
        let unavailable =
            |source: io::Error| ProbeError::PathUnavailable { path: path.to_path_buf(), source };
        let (total, used) = disk_usage(path).map_err(unavailable)?;
        // pseudo filesystems (procfs, sysfs) have no capacity to reclaim
        if total == 0 {
            return Err(unavailable(io::Error::other("filesystem reports zero capacity")));
        }
        Ok(usage_percent(total, used))
    }
}

// Returns (total, used) bytes. "Used" counts blocks reserved for root as used,
// i.e. total minus all free blocks.
#[cfg(unix)]
fn disk_usage(path: &Path) -> io::Result<(u64, u64)> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let mut stat = MaybeUninit::<libc::statvfs>::uninit();

    // Safety: c_path is NUL-terminated and stat points to writable memory of the right size.
    let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    // Safety: statvfs returned 0, so the struct is initialized.
    let stat = unsafe { stat.assume_init() };

    let fragment = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * fragment;
    let free = stat.f_bfree as u64 * fragment;
    Ok((total, total.saturating_sub(free)))
}

#[cfg(not(unix))]
fn disk_usage(_path: &Path) -> io::Result<(u64, u64)> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "disk usage is only available on unix"))
}
