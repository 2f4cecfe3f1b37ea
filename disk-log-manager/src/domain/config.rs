// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

/// Domain-specific rules for disk space reclamation.
///
/// This represents the decisions the reclamation loop makes: when to start
/// archiving, which files qualify and how gently the compression should run.
/// It's independent of CLI args, the config file format, or infrastructure concerns.
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct ReclaimRules {
    /// Disk usage (percent) at or above which archiving starts
    #[builder(default = 80.0)]
    pub threshold_percent: f64,

    /// Files must be strictly older than this many whole days
    #[builder(default = 7)]
    pub min_days_old: u64,

    /// Glob matched against file names
    #[builder(default = "*.log".to_string(), setter(into))]
    pub file_pattern: String,

    /// Scheduling hints for the compression worker
    #[builder(default)]
    pub priority: PriorityHints,
}

/// Advisory OS scheduling hints applied to archival work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityHints {
    /// Niceness of the compression thread (-20..=19)
    pub nice_level: i32,
    /// I/O scheduling class: 0 none, 1 realtime, 2 best-effort, 3 idle
    pub ionice_class: u8,
}

impl Default for PriorityHints {
    fn default() -> Self {
        Self { nice_level: 10, ionice_class: 3 }
    }
}
