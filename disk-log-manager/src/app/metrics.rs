// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use opentelemetry::metrics::Counter;
use opentelemetry::metrics::Gauge;
use opentelemetry::metrics::Meter;
use opentelemetry::KeyValue;

use crate::domain::models::ArchiveOutcome;
use crate::domain::models::IterationReport;
use crate::domain::models::LoopState;

const METRIC_PREFIX: &str = "dlm";

#[derive(Clone)]
pub struct Metrics {
    pub disk_usage_percent: Gauge<f64>,
    pub archives_created: Counter<u64>,
    pub archive_failures: Counter<u64>,
    pub files_archived: Counter<u64>,
    pub bytes_before: Counter<u64>,
    pub bytes_after: Counter<u64>,
}

impl Metrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            disk_usage_percent: meter.f64_gauge(prefix("disk_usage_percent")).build(),
            archives_created: meter.u64_counter(prefix("archives_created")).build(),
            archive_failures: meter.u64_counter(prefix("archive_failures")).build(),
            files_archived: meter.u64_counter(prefix("files_archived")).build(),
            bytes_before: meter.u64_counter(prefix("bytes_before")).build(),
            bytes_after: meter.u64_counter(prefix("bytes_after")).build(),
        }
    }

    pub fn report_iteration(&self, report: &IterationReport) {
        self.disk_usage_percent.record(report.usage_percent, &[]);
        if report.state == LoopState::Idle {
            return;
        }
        for dir in &report.directories {
            let attrs = [KeyValue::new("directory", dir.directory.display().to_string())];
            match &dir.outcome {
                ArchiveOutcome::Created(summary) => {
                    self.archives_created.add(1, &attrs);
                    self.files_archived.add(summary.files.len() as u64, &attrs);
                    self.bytes_before.add(summary.before_bytes, &attrs);
                    self.bytes_after.add(summary.after_bytes, &attrs);
                }
                ArchiveOutcome::Failed { .. } => self.archive_failures.add(1, &attrs),
                ArchiveOutcome::Empty | ArchiveOutcome::DryRun { .. } => {}
            }
        }
    }
}

fn prefix(suffix: &str) -> String {
    format!("{METRIC_PREFIX}_{suffix}")
}
