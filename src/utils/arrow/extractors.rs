//! Column extraction utilities for Arrow record batches
//!
//! This module provides high-level utilities for pulling whole columns out of
//! record batches as concrete array types, converting compatible source types
//! on the way. The aggregation kernels work on the extracted arrays.

use arrow::array::{Int64Array, StringArray, TimestampMillisecondArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};
use crate::utils::arrow::array_utils::{downcast_array, get_column_by_name};

/// Extract a column as an `Int64Array`
///
/// Narrower integer columns are widened with Arrow's cast kernel; string
/// columns are parsed (unparseable entries become null). Anything else is
/// rejected.
///
/// # Arguments
///
/// * `batch` - The record batch to extract from
/// * `column_name` - The name of the column
///
/// # Errors
/// Returns an error if the column is missing or not integer-like
pub fn int64_column(batch: &RecordBatch, column_name: &str) -> Result<Int64Array> {
    let array = get_column_by_name(batch, column_name)?;

    match array.data_type() {
        DataType::Int64 => {
            let ints = downcast_array::<Int64Array>(&array, column_name, "Int64")?;
            Ok(ints.clone())
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Utf8 => {
            let converted = cast(&array, &DataType::Int64).map_err(Error::ArrowError)?;
            let ints = downcast_array::<Int64Array>(&converted, column_name, "Int64")?;
            Ok(ints.clone())
        }
        _ => Err(Error::InvalidDataType {
            column: column_name.to_string(),
            expected: "Int64".to_string(),
        }
        .into()),
    }
}

/// Extract a column as a `TimestampMillisecondArray`
///
/// Date columns and timestamps of other resolutions are converted with
/// Arrow's cast kernel. String columns are not accepted here; date strings
/// are parsed once at load time.
///
/// # Arguments
///
/// * `batch` - The record batch to extract from
/// * `column_name` - The name of the column
///
/// # Errors
/// Returns an error if the column is missing or not date-like
pub fn timestamp_ms_column(
    batch: &RecordBatch,
    column_name: &str,
) -> Result<TimestampMillisecondArray> {
    let array = get_column_by_name(batch, column_name)?;

    match array.data_type() {
        DataType::Timestamp(TimeUnit::Millisecond, None) => {
            let ts = downcast_array::<TimestampMillisecondArray>(
                &array,
                column_name,
                "Timestamp(ms)",
            )?;
            Ok(ts.clone())
        }
        // Other resolutions and zoned timestamps are normalized so the
        // comparison kernels always see matching types
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let converted = cast(&array, &DataType::Timestamp(TimeUnit::Millisecond, None))
                .map_err(Error::ArrowError)?;
            let ts = downcast_array::<TimestampMillisecondArray>(
                &converted,
                column_name,
                "Timestamp(ms)",
            )?;
            Ok(ts.clone())
        }
        _ => Err(Error::InvalidDataType {
            column: column_name.to_string(),
            expected: "Timestamp(ms)".to_string(),
        }
        .into()),
    }
}

/// Extract a column as a `StringArray`
///
/// # Arguments
///
/// * `batch` - The record batch to extract from
/// * `column_name` - The name of the column
///
/// # Errors
/// Returns an error if the column is missing or not a string column
pub fn string_column(batch: &RecordBatch, column_name: &str) -> Result<StringArray> {
    let array = get_column_by_name(batch, column_name)?;

    match array.data_type() {
        DataType::Utf8 => {
            let strings = downcast_array::<StringArray>(&array, column_name, "Utf8")?;
            Ok(strings.clone())
        }
        DataType::LargeUtf8 => {
            let converted = cast(&array, &DataType::Utf8).map_err(Error::ArrowError)?;
            let strings = downcast_array::<StringArray>(&converted, column_name, "Utf8")?;
            Ok(strings.clone())
        }
        _ => Err(Error::InvalidDataType {
            column: column_name.to_string(),
            expected: "Utf8".to_string(),
        }
        .into()),
    }
}
