//! Date-range filtering for loan-record tables
//!
//! This module provides the inclusive calendar-date range every view filters
//! by, and the batch filter that applies it to a timestamp column. The end
//! bound covers its entire calendar day even though the column holds
//! timestamps, and rows whose date is null (including values that failed to
//! parse at load time) are always excluded.

use std::collections::HashSet;

use anyhow::Context;
use arrow::array::{Array, BooleanArray, TimestampMillisecondArray};
use arrow::compute::kernels::boolean;
use arrow::compute::kernels::cmp;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::filter::core::{BatchFilter, filter_batches, filter_record_batch};
use crate::utils::arrow::extractors::timestamp_ms_column;

/// An inclusive pair of calendar dates
///
/// Construction enforces `start <= end`; a reversed pair is a user error
/// that callers surface instead of aggregating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a new date range
    ///
    /// # Arguments
    /// * `start` - First day of the range (inclusive)
    /// * `end` - Last day of the range (inclusive)
    ///
    /// # Errors
    /// Returns [`Error::InvalidDateRange`] if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange { start, end }.into());
        }
        Ok(Self { start, end })
    }

    /// First day of the range
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Milliseconds since the epoch at the start of the first day
    #[must_use]
    pub fn start_timestamp_ms(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }

    /// Milliseconds since the epoch at the start of the day after the last day
    ///
    /// Timestamps strictly below this bound fall inside the range, which
    /// makes the end day fully inclusive. Saturates at `i64::MAX` when the
    /// end day has no successor.
    #[must_use]
    pub fn end_exclusive_timestamp_ms(&self) -> i64 {
        self.end.succ_opt().map_or(i64::MAX, |next| {
            next.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
        })
    }

    /// Check whether a timestamp in epoch milliseconds falls in the range
    #[must_use]
    pub fn contains_ms(&self, ts_ms: i64) -> bool {
        ts_ms >= self.start_timestamp_ms() && ts_ms < self.end_exclusive_timestamp_ms()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A filter that includes only rows whose date falls in a [`DateRange`]
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    /// The name of the date column
    date_column: String,

    /// The inclusive range to keep
    range: DateRange,
}

impl DateRangeFilter {
    /// Create a new date range filter
    ///
    /// # Arguments
    /// * `date_column` - The name of the timestamp column to test
    /// * `range` - The inclusive date range to keep
    #[must_use]
    pub fn new(date_column: impl Into<String>, range: DateRange) -> Self {
        Self {
            date_column: date_column.into(),
            range,
        }
    }
}

impl BatchFilter for DateRangeFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let date_array = timestamp_ms_column(batch, &self.date_column)?;

        // Vectorized comparison: date >= start of first day
        let start_ms = self.range.start_timestamp_ms();
        let start_array = TimestampMillisecondArray::from(vec![start_ms; batch.num_rows()]);
        let ge_result = cmp::gt_eq(&date_array, &start_array)
            .with_context(|| "Failed to compare dates against range start")?;

        // Vectorized comparison: date < start of the day after the last day,
        // so the end day is inclusive in its entirety
        let end_ms = self.range.end_exclusive_timestamp_ms();
        let end_array = TimestampMillisecondArray::from(vec![end_ms; batch.num_rows()]);
        let lt_result = cmp::lt(&date_array, &end_array)
            .with_context(|| "Failed to compare dates against range end")?;

        let in_range = boolean::and(&ge_result, &lt_result)
            .with_context(|| "Failed to combine date filters")?;

        // Rows with null dates are missing data, not matches
        let mut not_null_values = Vec::with_capacity(date_array.len());
        for i in 0..date_array.len() {
            not_null_values.push(!date_array.is_null(i));
        }
        let null_mask = BooleanArray::from(not_null_values);

        let mask = boolean::and(&in_range, &null_mask)
            .with_context(|| "Failed to combine masks")?;

        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        let mut cols = HashSet::new();
        cols.insert(self.date_column.clone());
        cols
    }
}

/// Filter a table of record batches to rows inside a date range
///
/// # Arguments
/// * `batches` - The record batches forming one logical table
/// * `date_column` - The name of the timestamp column to test
/// * `range` - The inclusive date range to keep
///
/// # Returns
/// The non-empty filtered batches; empty output means no rows matched
///
/// # Errors
/// Returns an error if the date column is missing or not date-like
pub fn filter_by_date_range(
    batches: &[RecordBatch],
    date_column: &str,
    range: DateRange,
) -> Result<Vec<RecordBatch>> {
    let filter = DateRangeFilter::new(date_column, range);
    filter_batches(batches, &filter)
}

/// The earliest and latest dates present in `date_column`, as a range.
///
/// Null timestamps are ignored. `None` means the column holds no usable
/// dates at all. Callers use this to default the report range to the
/// whole table, the way the dashboard seeds its date pickers.
///
/// # Errors
/// Returns an error if the date column is missing or not date-like.
pub fn date_column_bounds(
    batches: &[RecordBatch],
    date_column: &str,
) -> Result<Option<DateRange>> {
    let mut bounds: Option<(i64, i64)> = None;
    for batch in batches {
        let timestamps = timestamp_ms_column(batch, date_column)?;
        for i in 0..timestamps.len() {
            if timestamps.is_null(i) {
                continue;
            }
            let value = timestamps.value(i);
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
    }

    let Some((min, max)) = bounds else {
        return Ok(None);
    };
    match (
        DateTime::from_timestamp_millis(min),
        DateTime::from_timestamp_millis(max),
    ) {
        (Some(start), Some(end)) => {
            DateRange::new(start.date_naive(), end.date_naive()).map(Some)
        }
        _ => Ok(None),
    }
}
