// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//

use crate::domain::config::PriorityHints;
use crate::domain::traits::PriorityControl;

const IOPRIO_CLASS_SHIFT: u32 = 13;
const IOPRIO_CLASS_IDLE: u8 = 3;
// ionice(1) uses level 4 when no level is given
const IOPRIO_DEFAULT_LEVEL: u32 = 4;
#[cfg(target_os = "linux")]
const IOPRIO_WHO_PROCESS: libc::c_int = 1;

/// Packs an I/O class into the `ioprio_set(2)` value. `None` for class 0 (leave as is).
pub fn ioprio_value(ionice_class: u8) -> Option<u32> {
    match ionice_class {
        0 => None,
        // idle has no levels
        IOPRIO_CLASS_IDLE => Some((IOPRIO_CLASS_IDLE as u32) << IOPRIO_CLASS_SHIFT),
        class => Some(((class as u32) << IOPRIO_CLASS_SHIFT) | IOPRIO_DEFAULT_LEVEL),
    }
}

/// Lowers scheduling priority of the calling thread with `setpriority(2)` and
/// `ioprio_set(2)`. Does nothing on platforms without these primitives.
#[derive(Clone, Copy, Default)]
pub struct OsPriority;

impl PriorityControl for OsPriority {
    #[cfg(target_os = "linux")]
    fn apply_low_priority(&self, hints: &PriorityHints) -> anyhow::Result<()> {
        // Safety: gettid has no arguments and cannot fail.
        let tid = unsafe { libc::syscall(libc::SYS_gettid) } as libc::id_t;
        let mut failures = Vec::new();

        // Safety: no pointers are passed.
        if unsafe { libc::setpriority(libc::PRIO_PROCESS, tid, hints.nice_level) } != 0 {
            failures.push(format!(
                "setpriority({}): {}",
                hints.nice_level,
                std::io::Error::last_os_error()
            ));
        }

        if let Some(ioprio) = ioprio_value(hints.ionice_class) {
            // Safety: no pointers are passed; who=0 targets the calling thread.
            let ret = unsafe {
                libc::syscall(libc::SYS_ioprio_set, IOPRIO_WHO_PROCESS, 0, ioprio as libc::c_int)
            };
            if ret != 0 {
                failures.push(format!(
                    "ioprio_set(class {}): {}",
                    hints.ionice_class,
                    std::io::Error::last_os_error()
                ));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(failures.join("; "))
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn apply_low_priority(&self, hints: &PriorityHints) -> anyhow::Result<()> {
        tracing::debug!(?hints, "Scheduling priority hints are not supported on this platform");
        Ok(())
    }
}
