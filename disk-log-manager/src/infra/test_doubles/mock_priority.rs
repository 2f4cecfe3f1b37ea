// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use std::sync::Arc;
use std::sync::Mutex;

use crate::domain::config::PriorityHints;
use crate::domain::traits::PriorityControl;

/// Records requested hints instead of touching the scheduler.
#[allow(unused)]
#[derive(Clone, Default)]
pub struct MockPriority {
    applied: Arc<Mutex<Vec<PriorityHints>>>,
    fail: bool,
}

impl MockPriority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call records the hints and then reports an error.
    #[cfg(test)]
    pub fn failing() -> Self {
        MockPriority { fail: true, ..Self::default() }
    }

    #[cfg(test)]
    pub fn applied(&self) -> Vec<PriorityHints> {
        self.applied.lock().unwrap().clone()
    }
}

impl PriorityControl for MockPriority {
    fn apply_low_priority(&self, hints: &PriorityHints) -> anyhow::Result<()> {
        self.applied.lock().unwrap().push(*hints);
        if self.fail {
            anyhow::bail!("priority change not permitted");
        }
        Ok(())
    }
}
