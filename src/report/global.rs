//! Global view: form volume by status, loan line and month

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{
    CategoryCount, GroupCount, GroupOrder, MonthCount, count_by_category, count_by_month,
    group_count,
};
use crate::categories::global_map;
use crate::dataset::columns;
use crate::error::Result;
use crate::filter::{DateRange, filter_by_date_range};
use crate::loader::LoadedTable;
use crate::report::{ReportMeta, section};

const VIEW: &str = "global";

/// The global tab: status cards, forms per loan line (bar and pie share
/// the same counts) and the monthly series.
#[derive(Debug, Clone, Serialize)]
pub struct GlobalReport {
    pub meta: ReportMeta,
    pub cards: Option<Vec<CategoryCount>>,
    pub by_loan_line: Option<Vec<GroupCount>>,
    pub monthly: Option<Vec<MonthCount>>,
}

impl GlobalReport {
    /// Filters `table` to `range` over `FEC_FORM` and fills the sections.
    ///
    /// # Errors
    /// Fails when `FEC_FORM` is missing, since every section depends on
    /// the filtered rows. Other missing columns skip their section.
    pub fn build(table: &LoadedTable, range: DateRange) -> Result<Self> {
        let filtered = filter_by_date_range(&table.batches, columns::FEC_FORM, range)?;
        let rows_filtered = filtered.iter().map(RecordBatch::num_rows).sum();
        let meta = ReportMeta::new(table, range, rows_filtered);

        let cards = section(
            VIEW,
            "status cards",
            columns::ID_ESTADO_PRESTAMO,
            count_by_category(&filtered, columns::ID_ESTADO_PRESTAMO, &global_map()),
        )?;
        let by_loan_line = section(
            VIEW,
            "forms by loan line",
            columns::N_LINEA_PRESTAMO,
            group_count(&filtered, columns::N_LINEA_PRESTAMO, GroupOrder::ByKey),
        )?;
        let monthly = section(
            VIEW,
            "monthly series",
            columns::FEC_FORM,
            count_by_month(&filtered, columns::FEC_FORM),
        )?;

        Ok(Self {
            meta,
            cards,
            by_loan_line,
            monthly,
        })
    }
}
