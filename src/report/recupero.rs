//! Recovery view: repayment status broken down by locality

use arrow::record_batch::RecordBatch;
use serde::Serialize;

use crate::aggregate::{
    CategoryCount, GroupCount, GroupOrder, PivotTable, count_by_category, distinct_within_group,
    group_count, top_n_within_group,
};
use crate::categories::recupero_map;
use crate::dataset::columns;
use crate::error::Result;
use crate::filter::{DateRange, filter_by_date_range};
use crate::loader::LoadedTable;
use crate::report::{ReportMeta, TOP_LOCALITIES, section};

const VIEW: &str = "recupero";

/// The recovery tab.
///
/// `by_locality` carries the full locality ranking, largest first; the
/// dashboard draws it twice, once in full and once cut to the top ten,
/// via [`RecuperoReport::top_localities`]. The two pivot sections keep at
/// most ten localities per status, zero-filled across the grid.
#[derive(Debug, Clone, Serialize)]
pub struct RecuperoReport {
    pub meta: ReportMeta,
    pub cards: Option<Vec<CategoryCount>>,
    pub by_estado: Option<Vec<GroupCount>>,
    pub top_localities_by_estado: Option<PivotTable>,
    pub by_locality: Option<Vec<GroupCount>>,
    pub localities_per_estado: Option<Vec<GroupCount>>,
    pub top_localities_by_estado_id: Option<PivotTable>,
}

impl RecuperoReport {
    /// Filters `table` to `range` over `FECHA_INGRESO` and fills the
    /// sections.
    ///
    /// # Errors
    /// Fails when `FECHA_INGRESO` is missing. The delivered files have
    /// omitted it before, and without it none of the sections mean
    /// anything, so the whole view is withheld rather than shown empty.
    pub fn build(table: &LoadedTable, range: DateRange) -> Result<Self> {
        let filtered = filter_by_date_range(&table.batches, columns::FECHA_INGRESO, range)?;
        let rows_filtered = filtered.iter().map(RecordBatch::num_rows).sum();
        let meta = ReportMeta::new(table, range, rows_filtered);

        let cards = section(
            VIEW,
            "status cards",
            columns::ID_ESTADO_PRESTAMO,
            count_by_category(&filtered, columns::ID_ESTADO_PRESTAMO, &recupero_map()),
        )?;
        let by_estado = section(
            VIEW,
            "forms by status",
            columns::N_ESTADO_PRESTAMO,
            group_count(&filtered, columns::N_ESTADO_PRESTAMO, GroupOrder::ByKey),
        )?;
        let top_localities_by_estado = section(
            VIEW,
            "top localities by status",
            columns::N_LOCALIDAD,
            top_n_within_group(
                &filtered,
                columns::N_ESTADO_PRESTAMO,
                columns::N_LOCALIDAD,
                TOP_LOCALITIES,
            ),
        )?
        .map(|cross| cross.to_pivot());
        let by_locality = section(
            VIEW,
            "locality counts",
            columns::N_LOCALIDAD,
            group_count(&filtered, columns::N_LOCALIDAD, GroupOrder::CountDesc),
        )?;
        let localities_per_estado = section(
            VIEW,
            "localities per status",
            columns::N_LOCALIDAD,
            distinct_within_group(
                &filtered,
                columns::ID_ESTADO_PRESTAMO,
                columns::N_LOCALIDAD,
                GroupOrder::ByKey,
            ),
        )?;
        let top_localities_by_estado_id = section(
            VIEW,
            "top localities by status id",
            columns::N_LOCALIDAD,
            top_n_within_group(
                &filtered,
                columns::ID_ESTADO_PRESTAMO,
                columns::N_LOCALIDAD,
                TOP_LOCALITIES,
            ),
        )?
        .map(|cross| cross.to_pivot());

        Ok(Self {
            meta,
            cards,
            by_estado,
            top_localities_by_estado,
            by_locality,
            localities_per_estado,
            top_localities_by_estado_id,
        })
    }

    /// The first `TOP_LOCALITIES` entries of the locality ranking.
    #[must_use]
    pub fn top_localities(&self) -> Option<&[GroupCount]> {
        self.by_locality
            .as_deref()
            .map(|ranking| &ranking[..ranking.len().min(TOP_LOCALITIES)])
    }
}
