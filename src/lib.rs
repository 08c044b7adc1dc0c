//! A Rust library for building the Banco de la Gente loan reports: CSV
//! ingestion into Arrow batches, date-range filtering, categorical
//! aggregation and the three dashboard views.

pub mod aggregate;
pub mod categories;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod report;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{CsvReadConfig, DateParseConfig, DEFAULT_BATCH_SIZE};
pub use dataset::{Dataset, SchemaIssue, SchemaReport, detect_dataset};
pub use error::{Error, Result};
pub use loader::{LoadedTable, load_csv_dir, load_table};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Filtering capabilities
pub use filter::{BatchFilter, DateRange, DateRangeFilter};
pub use filter::{date_column_bounds, filter_by_date_range, filter_record_batch};

// Aggregation kernels
pub use aggregate::{
    CategoryCount, CrossTab, GroupCount, GroupKey, GroupOrder, MonthCount, PivotTable,
    count_by_category, count_by_month, distinct_within_group, group_count, top_n_within_group,
};

// Report views
pub use report::{GlobalReport, RechazoReport, RecuperoReport, ReportMeta};
