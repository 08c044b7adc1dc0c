//! Arrow data handling utilities
//!
//! This module contains utilities for working with Arrow arrays, data types,
//! and record batches. It provides helpers for column lookup, type adaptation
//! and typed value extraction.

pub mod array_utils;
pub mod extractors;

// Re-export commonly used functions for convenience
pub use array_utils::{downcast_array, get_column_by_name, get_column_index};
pub use extractors::{int64_column, string_column, timestamp_ms_column};
