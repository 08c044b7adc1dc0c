//! Core filtering functionality for record batches
//!
//! This module defines the common trait and helpers for filtering Arrow
//! record batches. Concrete filters build a boolean mask and hand it to
//! [`filter_record_batch`], which applies it column by column.

use std::collections::HashSet;

use anyhow::Context;
use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute::filter as arrow_filter;
use arrow::record_batch::RecordBatch;

use crate::error::Result;

/// Filter a record batch based on a boolean mask
///
/// # Arguments
/// * `batch` - The record batch to filter
/// * `mask` - The boolean mask indicating which rows to keep
///
/// # Returns
/// A new record batch with only rows where mask is true
///
/// # Errors
/// Returns an error if filtering fails
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    // Validate with clear error message
    if batch.num_rows() != mask.len() {
        return Err(anyhow::anyhow!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        ));
    }

    // Apply the filter to all columns with specific error context
    let filtered_columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| arrow_filter(col, mask))
        .collect::<arrow::error::Result<_>>()
        .with_context(|| "Failed to apply boolean filter to columns")?;

    // Create a new record batch with filtered data
    RecordBatch::try_new(batch.schema(), filtered_columns)
        .with_context(|| "Failed to create filtered record batch")
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    ///
    /// # Arguments
    /// * `batch` - The record batch to filter
    ///
    /// # Returns
    /// A filtered record batch
    ///
    /// # Errors
    /// Returns an error if filtering fails
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String>;
}

/// Apply a filter across a whole table of record batches
///
/// Empty result batches are dropped; an empty output vector is the valid
/// "no rows matched" case, not an error.
///
/// # Arguments
/// * `batches` - The record batches forming one logical table
/// * `filter` - The filter to apply
///
/// # Returns
/// The non-empty filtered batches
///
/// # Errors
/// Returns an error if filtering any batch fails
pub fn filter_batches(batches: &[RecordBatch], filter: &dyn BatchFilter) -> Result<Vec<RecordBatch>> {
    let mut filtered_batches = Vec::with_capacity(batches.len());

    for batch in batches {
        let filtered_batch = filter.filter(batch)?;

        // Only keep non-empty batches
        if filtered_batch.num_rows() > 0 {
            filtered_batches.push(filtered_batch);
        }
    }

    Ok(filtered_batches)
}
