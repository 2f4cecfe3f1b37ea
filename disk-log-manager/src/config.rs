// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::domain::config::PriorityHints;
use crate::domain::config::ReclaimRules;
use crate::domain::paths::archive_dir_for;
use crate::Args;

const DEFAULT_FILE_PATTERN: &str = "*.log";
const DEFAULT_ARCHIVE_ROOT: &str = "archives";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: serde_yaml::Error },

    #[error("threshold_percent must be within 0..=100, got {0}")]
    ThresholdOutOfRange(f64),

    #[error("check_interval_seconds must be greater than zero")]
    ZeroInterval,

    #[error("nice_level must be within -20..=19, got {0}")]
    NiceOutOfRange(i32),

    #[error("ionice_class must be within 0..=3, got {0}")]
    IoniceClassOutOfRange(u8),

    #[error("invalid file_pattern '{pattern}': {source}")]
    Pattern { pattern: String, source: globset::Error },
}

/// Daemon configuration file
///
/// # Examples
///
/// ```yaml
/// disk_path: /
/// threshold_percent: 80
/// log_directories:
///   - /var/log/myapp
///   - /opt/service/logs
/// min_days_old: 7
/// check_interval_seconds: 300
/// nice_level: 10
/// ionice_class: 3
/// # optional
/// file_pattern: "*.log"
/// archive_root: archives
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub disk_path: PathBuf,
    pub threshold_percent: f64,
    pub log_directories: Vec<PathBuf>,
    pub min_days_old: u64,
    pub check_interval_seconds: u64,
    pub nice_level: i32,
    pub ionice_class: u8,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
    #[serde(default = "default_archive_root")]
    pub archive_root: PathBuf,
}

fn default_file_pattern() -> String {
    DEFAULT_FILE_PATTERN.to_string()
}

fn default_archive_root() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_ROOT)
}

impl Settings {
    /// Read and validate config from file
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let settings: Settings = serde_yaml::from_reader(file)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.threshold_percent) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold_percent));
        }
        if self.check_interval_seconds == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !(-20..=19).contains(&self.nice_level) {
            return Err(ConfigError::NiceOutOfRange(self.nice_level));
        }
        if self.ionice_class > 3 {
            return Err(ConfigError::IoniceClassOutOfRange(self.ionice_class));
        }
        globset::Glob::new(&self.file_pattern).map_err(|source| ConfigError::Pattern {
            pattern: self.file_pattern.clone(),
            source,
        })?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub disk_path: PathBuf,
    pub threshold_percent: f64,
    pub log_directories: Vec<PathBuf>,
    pub min_days_old: u64,
    pub check_interval: Duration,
    pub priority: PriorityHints,
    pub file_pattern: String,
    pub archive_root: PathBuf,
    pub dry_run: bool,
    pub once: bool,
}

impl AppConfig {
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        Ok(Self::new(Settings::read_from_file(&args.config)?, args))
    }

    pub fn new(settings: Settings, args: &Args) -> Self {
        Self {
            disk_path: settings.disk_path,
            threshold_percent: settings.threshold_percent,
            log_directories: settings.log_directories,
            min_days_old: settings.min_days_old,
            check_interval: Duration::from_secs(settings.check_interval_seconds),
            priority: PriorityHints {
                nice_level: settings.nice_level,
                ionice_class: settings.ionice_class,
            },
            file_pattern: settings.file_pattern,
            archive_root: args.archive_root.clone().unwrap_or(settings.archive_root),
            dry_run: args.dry_run,
            once: args.once,
        }
    }

    pub fn rules(&self) -> ReclaimRules {
        ReclaimRules::builder()
            .threshold_percent(self.threshold_percent)
            .min_days_old(self.min_days_old)
            .file_pattern(self.file_pattern.clone())
            .priority(self.priority)
            .build()
    }

    /// Archive directories targeted by more than one watched directory.
    pub fn shared_archive_dirs(&self) -> BTreeMap<PathBuf, Vec<PathBuf>> {
        let mut targets: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for dir in &self.log_directories {
            targets.entry(archive_dir_for(&self.archive_root, dir)).or_default().push(dir.clone());
        }
        targets.retain(|_, dirs| dirs.len() > 1);
        targets
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "disk_path={}", self.disk_path.display())?;
        writeln!(f, "threshold_percent={}", self.threshold_percent)?;
        let dirs: Vec<String> =
            self.log_directories.iter().map(|d| d.display().to_string()).collect();
        writeln!(f, "log_directories=[{}]", dirs.join(", "))?;
        writeln!(f, "min_days_old={}", self.min_days_old)?;
        writeln!(f, "check_interval={}s", self.check_interval.as_secs())?;
        writeln!(f, "nice_level={}", self.priority.nice_level)?;
        writeln!(f, "ionice_class={}", self.priority.ionice_class)?;
        writeln!(f, "file_pattern={}", self.file_pattern)?;
        writeln!(f, "archive_root={}", self.archive_root.display())?;
        write!(f, "dry_run={}", self.dry_run)
    }
}
