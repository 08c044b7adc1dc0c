//! Monthly time series over a date column

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Datelike, NaiveDate};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::Result;
use crate::utils::arrow::timestamp_ms_column;

/// Row count for one calendar month, keyed by the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub month: NaiveDate,
    pub count: u64,
}

impl MonthCount {
    /// The month as `YYYY-MM`, the form the charts label their axis with.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.month.year(), self.month.month())
    }
}

/// Counts rows per calendar month of `date_column`, ascending by month.
///
/// Null dates are skipped. Months with no rows do not appear.
///
/// # Errors
/// Returns an error if the column is missing or cannot be read as a
/// timestamp.
pub fn count_by_month(batches: &[RecordBatch], date_column: &str) -> Result<Vec<MonthCount>> {
    let mut tally: FxHashMap<NaiveDate, u64> = FxHashMap::default();
    for batch in batches {
        let timestamps = timestamp_ms_column(batch, date_column)?;
        for i in 0..timestamps.len() {
            if timestamps.is_null(i) {
                continue;
            }
            let Some(datetime) = DateTime::from_timestamp_millis(timestamps.value(i)) else {
                continue;
            };
            let day = datetime.date_naive();
            let month = day.with_day(1).unwrap_or(day);
            *tally.entry(month).or_insert(0) += 1;
        }
    }

    let mut months: Vec<MonthCount> = tally
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect();
    months.sort_by_key(|entry| entry.month);
    Ok(months)
}
