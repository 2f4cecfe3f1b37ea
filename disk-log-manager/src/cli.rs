use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Archives aged log files when disk usage crosses a threshold")]
pub struct Args {
    /// Path to the YAML configuration
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Dry run mode (report what would be archived, don't compress or delete)
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Log file appended to alongside stdout
    #[arg(long, default_value = "logs/disklogmanager.log")]
    pub log_file: PathBuf,

    /// Root directory for archives (overrides `archive_root` from the config)
    #[arg(long, env = "DLM_ARCHIVE_ROOT")]
    pub archive_root: Option<PathBuf>,

    /// Run a single check and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Export metrics over OTLP (configured via OTEL_EXPORTER_OTLP_* env)
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["disk-log-manager"]);
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert_eq!(args.log_file, PathBuf::from("logs/disklogmanager.log"));
        assert!(!args.dry_run);
        assert!(!args.once);
        assert!(!args.metrics);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "disk-log-manager",
            "--config",
            "/etc/dlm.yaml",
            "--dry-run",
            "--once",
            "--archive-root",
            "/srv/archives",
        ]);
        assert_eq!(args.config, PathBuf::from("/etc/dlm.yaml"));
        assert!(args.dry_run);
        assert!(args.once);
        assert_eq!(args.archive_root, Some(PathBuf::from("/srv/archives")));
    }
}
