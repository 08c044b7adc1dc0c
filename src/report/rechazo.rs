//! Rejection view: rejected forms by status code and rejection line

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{
    CategoryCount, GroupCount, GroupOrder, count_by_category, group_count,
};
use crate::categories::rechazo_map;
use crate::dataset::columns;
use crate::error::Result;
use crate::filter::{DateRange, filter_by_date_range};
use crate::loader::LoadedTable;
use crate::report::{ReportMeta, section};

const VIEW: &str = "rechazo";

/// The rejection tab: rejection cards, forms per status code and the
/// rejection-line breakdown the pie chart draws.
#[derive(Debug, Clone, Serialize)]
pub struct RechazoReport {
    pub meta: ReportMeta,
    pub cards: Option<Vec<CategoryCount>>,
    pub by_estado_id: Option<Vec<GroupCount>>,
    pub by_linea_rechazo: Option<Vec<GroupCount>>,
}

impl RechazoReport {
    /// Filters `table` to `range` over `FEC_RECHAZO` and fills the
    /// sections.
    ///
    /// # Errors
    /// Fails when `FEC_RECHAZO` is missing. Other missing columns skip
    /// their section.
    pub fn build(table: &LoadedTable, range: DateRange) -> Result<Self> {
        let filtered = filter_by_date_range(&table.batches, columns::FEC_RECHAZO, range)?;
        let rows_filtered = filtered.iter().map(RecordBatch::num_rows).sum();
        let meta = ReportMeta::new(table, range, rows_filtered);

        let cards = section(
            VIEW,
            "rejection cards",
            columns::ID_ESTADO_PRESTAMO,
            count_by_category(&filtered, columns::ID_ESTADO_PRESTAMO, &rechazo_map()),
        )?;
        let by_estado_id = section(
            VIEW,
            "forms by status id",
            columns::ID_ESTADO_PRESTAMO,
            group_count(&filtered, columns::ID_ESTADO_PRESTAMO, GroupOrder::ByKey),
        )?;
        let by_linea_rechazo = section(
            VIEW,
            "forms by rejection line",
            columns::N_LINEA_RECHAZO,
            group_count(&filtered, columns::N_LINEA_RECHAZO, GroupOrder::ByKey),
        )?;

        Ok(Self {
            meta,
            cards,
            by_estado_id,
            by_linea_rechazo,
        })
    }
}
