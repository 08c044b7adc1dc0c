//! Aggregation kernels for the report views
//!
//! Every view boils down to the same small set of computations over a
//! date-filtered table: counts per named status-code bucket, group-by
//! tallies in two orderings, per-group top-N tables with a dense pivot,
//! distinct counts and a monthly series. They are implemented here exactly
//! once; the views only assemble their results.
//!
//! All kernels take a slice of record batches (one logical table), treat an
//! empty slice as a valid table and return empty or zero results for it.

pub mod category;
pub mod group;
pub mod series;

// Re-export the aggregation surface
pub use category::{CategoryCount, count_by_category};
pub use group::{
    CrossCell, CrossTab, GroupCount, GroupKey, GroupOrder, PivotTable, distinct_within_group,
    group_count, top_n_within_group,
};
pub use series::{MonthCount, count_by_month};
