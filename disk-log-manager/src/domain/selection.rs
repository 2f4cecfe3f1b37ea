// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//
use std::time::Duration;
use std::time::SystemTime;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Minimum age a file must exceed, as a duration.
pub fn min_age(min_days_old: u64) -> Duration {
    Duration::from_secs(min_days_old.saturating_mul(SECS_PER_DAY))
}

/// True when `modified` lies strictly more than `min_days_old` days before `now`.
///
/// A file exactly `min_days_old * 24h` old does not qualify. No rounding to
/// whole days is done. Timestamps in the future never qualify.
pub fn is_aged(modified: SystemTime, now: SystemTime, min_days_old: u64) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age > min_age(min_days_old),
        Err(_) => false,
    }
}
