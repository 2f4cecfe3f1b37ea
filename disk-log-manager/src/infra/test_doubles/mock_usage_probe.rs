// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::time::Instant;

use crate::domain::models::ProbeError;
use crate::domain::traits::UsageProbe;

/// Usage probe returning a fixed reading, or failing like a missing disk path.
///
/// Records the (tokio) instant of every reading so tests can check the loop cadence.
/// An optional shutdown sender is triggered once `stop_after` readings were taken.
#[allow(unused)]
#[derive(Clone)]
pub struct MockUsageProbe {
    usage: Option<f64>,
    readings: Arc<Mutex<Vec<Instant>>>,
    stop: Option<(usize, Arc<tokio::sync::watch::Sender<bool>>)>,
}

impl MockUsageProbe {
    pub fn fixed(usage: f64) -> Self {
        MockUsageProbe { usage: Some(usage), readings: Arc::default(), stop: None }
    }

    #[cfg(test)]
    pub fn unavailable() -> Self {
        MockUsageProbe { usage: None, readings: Arc::default(), stop: None }
    }

    #[cfg(test)]
    pub fn stop_after(
        mut self,
        readings: usize,
        shutdown_tx: tokio::sync::watch::Sender<bool>,
    ) -> Self {
        self.stop = Some((readings, Arc::new(shutdown_tx)));
        self
    }

    #[cfg(test)]
    pub fn readings(&self) -> Vec<Instant> {
        self.readings.lock().unwrap().clone()
    }
}

impl UsageProbe for MockUsageProbe {
    fn usage_percent(&self, path: &Path) -> Result<f64, ProbeError> {
        let taken = {
            let mut readings = self.readings.lock().unwrap();
            readings.push(Instant::now());
            readings.len()
        };
        if let Some((limit, shutdown_tx)) = &self.stop {
            if taken >= *limit {
                let _ = shutdown_tx.send(true);
            }
        }
        self.usage.ok_or_else(|| ProbeError::PathUnavailable {
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }
}
