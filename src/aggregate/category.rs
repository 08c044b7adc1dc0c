//! Counting rows per named status-code bucket

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::categories::CategoryMap;
use crate::error::Result;
use crate::utils::arrow::int64_column;

/// One bucket of a category map together with the number of rows whose
/// status code belongs to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

/// Counts rows per bucket of `map` over the status-code column.
///
/// The status column is read as signed integers; string-typed code columns
/// are adapted by the extractor. Null codes and codes that belong to no
/// bucket are ignored. A code listed in several buckets is counted in each
/// of them, so the bucket counts may sum to more than the row count.
///
/// The result has one entry per bucket in map order, including buckets
/// whose count is zero.
///
/// # Errors
/// Returns an error if the status column is missing or cannot be read as
/// integers.
pub fn count_by_category(
    batches: &[RecordBatch],
    status_column: &str,
    map: &CategoryMap,
) -> Result<Vec<CategoryCount>> {
    // Tally each raw code once, then resolve the buckets against the tally.
    let mut tally: FxHashMap<i64, u64> = FxHashMap::default();
    for batch in batches {
        let codes = int64_column(batch, status_column)?;
        for i in 0..codes.len() {
            if codes.is_null(i) {
                continue;
            }
            *tally.entry(codes.value(i)).or_insert(0) += 1;
        }
    }

    let counts = map
        .entries()
        .iter()
        .map(|entry| {
            let count = entry
                .codes
                .iter()
                .map(|code| tally.get(&i64::from(*code)).copied().unwrap_or(0))
                .sum();
            CategoryCount {
                label: entry.label.clone(),
                count,
            }
        })
        .collect();
    Ok(counts)
}
