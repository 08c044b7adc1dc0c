//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely looking up and
//! downcasting record batch columns, with clear errors naming the column.

use arrow::array::{Array, ArrayRef};
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Downcast a column to a specific array type with clear error messages
///
/// # Type Parameters
///
/// * `A` - The target array type to downcast to
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
///
/// # Returns
///
/// * `Ok(&A)` - The downcasted array reference
/// * `Err(Error)` - If the downcast fails
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| {
            Error::InvalidDataType {
                column: column_name.to_string(),
                expected: expected_type_name.to_string(),
            }
            .into()
        })
}

/// Get the column index by name from a record batch
///
/// # Arguments
/// * `batch` - The record batch
/// * `column_name` - The name of the column to find
///
/// # Returns
/// The index of the column
///
/// # Errors
/// Returns an error if the column does not exist
pub fn get_column_index(batch: &RecordBatch, column_name: &str) -> Result<usize> {
    batch.schema().index_of(column_name).map_err(|_| {
        Error::ColumnNotFound {
            column: column_name.to_string(),
        }
        .into()
    })
}

/// Get a column from a record batch by name
///
/// # Arguments
/// * `batch` - The record batch
/// * `column_name` - The name of the column to find
///
/// # Returns
/// The column as an `ArrayRef`
///
/// # Errors
/// Returns an error if the column does not exist
pub fn get_column_by_name(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = get_column_index(batch, column_name)?;
    Ok(batch.column(idx).clone())
}
