//! Date-column parsing for loaded CSV batches
//!
//! The exports carry dates as strings in several formats. This module
//! rewrites the configured date columns to millisecond timestamps right
//! after the CSV read, so the filtering and aggregation layers only ever
//! see one date representation. Values matching no format become null,
//! which the date-range filter later excludes as missing data.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, StringArray, TimestampMillisecondArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;

use crate::config::DateParseConfig;
use crate::error::{Error, Result};
use crate::utils::arrow::array_utils::downcast_array;

/// Parse one date string against the configured format list
///
/// Formats are tried in order; the first hit wins. Date-only formats parse
/// to midnight.
#[must_use]
pub fn parse_date_value(raw: &str, config: &DateParseConfig) -> Option<NaiveDateTime> {
    for format in &config.date_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Rewrite the given date columns of a batch to millisecond timestamps
///
/// Columns absent from the batch are skipped. String columns are parsed
/// value by value; date and timestamp columns of other resolutions are
/// converted with Arrow's cast kernel. Columns of any other type are left
/// untouched with a warning.
///
/// # Arguments
/// * `batch` - The batch to rewrite
/// * `date_columns` - Names of the columns holding dates
/// * `config` - The format list to parse strings with
///
/// # Errors
/// Returns an error if rebuilding the record batch fails
pub fn parse_date_columns(
    batch: &RecordBatch,
    date_columns: &[&str],
    config: &DateParseConfig,
) -> Result<RecordBatch> {
    let mut fields = batch.schema().fields().to_vec();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    let mut changed = false;

    for &name in date_columns {
        let Ok(idx) = batch.schema().index_of(name) else {
            continue;
        };

        let converted: ArrayRef = match columns[idx].data_type() {
            DataType::Utf8 => Arc::new(parse_string_column(&columns[idx], name, config)?),
            DataType::Timestamp(TimeUnit::Millisecond, None) => continue,
            DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
                cast(&columns[idx], &DataType::Timestamp(TimeUnit::Millisecond, None))
                    .map_err(Error::ArrowError)?
            }
            other => {
                warn!("Column '{name}' has type {other:?}, expected dates; leaving as is");
                continue;
            }
        };

        fields[idx] = Arc::new(Field::new(
            name,
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ));
        columns[idx] = converted;
        changed = true;
    }

    if !changed {
        return Ok(batch.clone());
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, columns).map_err(|e| Error::ArrowError(e).into())
}

/// Parse a string column into a timestamp array, nulling unparseable values
fn parse_string_column(
    array: &ArrayRef,
    name: &str,
    config: &DateParseConfig,
) -> Result<TimestampMillisecondArray> {
    let strings = downcast_array::<StringArray>(array, name, "Utf8")?;

    let mut values: Vec<Option<i64>> = Vec::with_capacity(strings.len());
    let mut unparsed = 0usize;

    for i in 0..strings.len() {
        if strings.is_null(i) {
            values.push(None);
            continue;
        }

        let raw = strings.value(i).trim();
        if raw.is_empty() {
            values.push(None);
            continue;
        }

        match parse_date_value(raw, config) {
            Some(datetime) => values.push(Some(datetime.and_utc().timestamp_millis())),
            None => {
                unparsed += 1;
                values.push(None);
            }
        }
    }

    if unparsed > 0 {
        warn!("Column '{name}': {unparsed} values matched no date format and were set to null");
    }

    Ok(TimestampMillisecondArray::from(values))
}
