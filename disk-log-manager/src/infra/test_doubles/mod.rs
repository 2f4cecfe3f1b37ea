// 2022-2025 (c) Copyright Contributors to the GOSH DAO. All rights reserved.
//
//! Test doubles for infrastructure clients, enabling testing without I/O.
//!
//! Use these in tests instead of conditional `dry_run` logic in production code.

pub mod log_capture;
pub mod mock_archiver;
pub mod mock_file_selector;
pub mod mock_priority;
pub mod mock_usage_probe;
