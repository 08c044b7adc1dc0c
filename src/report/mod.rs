//! Report views assembled from the aggregation kernels
//!
//! Each view mirrors one tab of the dashboard. A view filters its table to
//! the requested date range over its own date column, then fills its
//! sections from the filtered rows. The date column is indispensable, so a
//! table without it fails the whole view; any other missing column only
//! skips the section that needed it, with a warning.

pub mod global;
pub mod rechazo;
pub mod recupero;

pub use global::GlobalReport;
pub use rechazo::RechazoReport;
pub use recupero::RecuperoReport;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{Result, is_missing_column};
use crate::filter::DateRange;
use crate::loader::LoadedTable;
use crate::utils::logging::log_section_skipped;

/// How many inner groups the per-group locality tables keep.
pub const TOP_LOCALITIES: usize = 10;

/// Provenance and row accounting shared by every view.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub table: String,
    pub dataset: Dataset,
    pub range: DateRange,
    pub rows_total: usize,
    pub rows_filtered: usize,
    pub file_date: Option<DateTime<Local>>,
}

impl ReportMeta {
    pub(crate) fn new(table: &LoadedTable, range: DateRange, rows_filtered: usize) -> Self {
        Self {
            table: table.name.clone(),
            dataset: table.dataset,
            range,
            rows_total: table.num_rows(),
            rows_filtered,
            file_date: table.file_date,
        }
    }
}

/// Runs one section of a view, degrading a missing column to a skipped
/// section instead of failing the view.
pub(crate) fn section<T>(
    view: &str,
    name: &str,
    column: &str,
    result: Result<T>,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if is_missing_column(&err) => {
            log_section_skipped(view, name, column);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
