//! Shared utilities for Arrow data access, logging and progress reporting.

pub mod arrow;
pub mod logging;

// Re-export commonly used functions for convenience
pub use arrow::{get_column_by_name, get_column_index};
pub use logging::{log_operation_complete, log_operation_start, log_warning};
