//! Row filtering for loan-record tables
//!
//! This module provides the filtering layer of the reporting pipeline. The
//! only filter the views need is the inclusive date range, built on a small
//! trait so the report assembly stays independent of the concrete mask
//! construction.

pub mod core;
pub mod date;

// Re-export the common filter surface
pub use self::core::{BatchFilter, filter_batches, filter_record_batch};
pub use self::date::{DateRange, DateRangeFilter, date_column_bounds, filter_by_date_range};
