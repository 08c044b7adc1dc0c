//! CSV loading for the program exports
//!
//! This module reads the CSV exports into Arrow record batches: schema
//! inference and typed reading through Arrow's CSV reader, then a pass that
//! parses the layout's date columns from strings to timestamps (unparseable
//! values become null). Whole directories load in parallel with rayon.

pub mod dates;

use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Local};
use indicatif::ParallelProgressIterator;
use log::{info, warn};
use rayon::prelude::*;

use crate::config::CsvReadConfig;
use crate::dataset::{Dataset, check_schema, detect_dataset};
use crate::error::Result;
use crate::error::util::{safe_open_file, validate_directory};
use crate::loader::dates::parse_date_columns;
use crate::utils::logging::progress::{create_load_progress_bar, finish_progress_bar};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// One loaded source file: its batches plus bookkeeping the views display
#[derive(Debug, Clone)]
pub struct LoadedTable {
    /// File stem the table was loaded from
    pub name: String,
    /// Detected dataset layout
    pub dataset: Dataset,
    /// The table contents
    pub batches: Vec<RecordBatch>,
    /// Last modification timestamp of the source file ("data updated at")
    pub file_date: Option<DateTime<Local>>,
}

impl LoadedTable {
    /// Total number of rows across all batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Schema of the table, if it holds any batch
    #[must_use]
    pub fn schema(&self) -> Option<SchemaRef> {
        self.batches.first().map(RecordBatch::schema)
    }
}

/// Read CSV content into Arrow record batches
///
/// The schema is inferred from a sample of the input, then the reader is
/// rewound for the typed read.
///
/// # Arguments
/// * `reader` - The CSV content (file or in-memory buffer)
/// * `config` - Reader configuration
///
/// # Errors
/// Returns an error if inference or reading fails
pub fn read_csv<R: Read + Seek>(mut reader: R, config: &CsvReadConfig) -> Result<Vec<RecordBatch>> {
    let format = Format::default()
        .with_header(config.has_header)
        .with_delimiter(config.delimiter);

    let (schema, _) = format
        .infer_schema(&mut reader, Some(config.max_infer_records))
        .with_context(|| "Failed to infer CSV schema")?;
    reader
        .rewind()
        .with_context(|| "Failed to rewind CSV input after schema inference")?;

    let csv_reader = ReaderBuilder::new(Arc::new(schema))
        .with_format(format)
        .with_batch_size(config.batch_size)
        .build(reader)
        .with_context(|| "Failed to build CSV reader")?;

    let mut batches = Vec::new();
    for batch_result in csv_reader {
        let batch = batch_result.with_context(|| "Failed to read CSV record batch")?;
        batches.push(batch);
    }

    Ok(batches)
}

/// Load one CSV export into a [`LoadedTable`]
///
/// Detects the dataset layout, logs schema issues, parses the layout's date
/// columns and records the file's modification timestamp.
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `config` - Reader configuration
///
/// # Errors
/// Returns an error if the file cannot be read or parsed
pub fn load_table(path: &Path, config: &CsvReadConfig) -> Result<LoadedTable> {
    let start = Instant::now();
    log_operation_start("Loading CSV file", path);

    let file = safe_open_file(path, "reading loan records")?;
    let file_date = file
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Local>::from);

    let raw = read_csv(file, config)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    let dataset = raw
        .first()
        .map_or(Dataset::Unknown, |batch| detect_dataset(&batch.schema()));

    if let Some(batch) = raw.first() {
        let report = check_schema(dataset, &batch.schema());
        for issue in &report.issues {
            warn!("{}: {}", path.display(), issue.description);
        }
    } else {
        log_warning("CSV file holds no rows", Some(path));
    }

    let batches = raw
        .iter()
        .map(|batch| parse_date_columns(batch, dataset.date_columns(), &config.date_parse_config))
        .collect::<Result<Vec<_>>>()?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string();

    let table = LoadedTable {
        name,
        dataset,
        batches,
        file_date,
    };
    log_operation_complete("loaded", path, table.num_rows(), Some(start.elapsed()));

    Ok(table)
}

/// Load every CSV export in a directory in parallel
///
/// # Arguments
/// * `dir` - Directory holding the exports
/// * `config` - Reader configuration
///
/// # Returns
/// One [`LoadedTable`] per CSV file, in stable path order
///
/// # Errors
/// Returns an error if the directory is unreadable or any file fails to load
pub fn load_csv_dir(dir: &Path, config: &CsvReadConfig) -> Result<Vec<LoadedTable>> {
    // Validate the directory exists and is readable
    validate_directory(dir, "loading loan record exports")?;

    // Find all CSV files in the directory
    let mut csv_files = Vec::<PathBuf>::new();
    for entry_result in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry_result
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;

        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            csv_files.push(path);
        }
    }
    csv_files.sort();

    // If no files found, return empty result
    if csv_files.is_empty() {
        info!("No CSV files found in directory: {}", dir.display());
        return Ok(Vec::new());
    }

    info!("Found {} CSV files in {}", csv_files.len(), dir.display());

    // Process files in parallel using rayon
    let pb = create_load_progress_bar(csv_files.len() as u64, Some("Loading CSV files"));
    let all_tables: Vec<Result<LoadedTable>> = csv_files
        .par_iter()
        .progress_with(pb.clone())
        .map(|path| load_table(path, config))
        .collect();
    finish_progress_bar(&pb, Some("CSV files loaded"));

    // Combine all the results, propagating any errors
    let mut tables = Vec::with_capacity(all_tables.len());
    for (idx, result) in all_tables.into_iter().enumerate() {
        let table = result.with_context(|| {
            format!(
                "Error processing file {}",
                csv_files
                    .get(idx)
                    .map_or_else(|| "unknown".to_string(), |p| p.display().to_string())
            )
        })?;
        tables.push(table);
    }

    Ok(tables)
}
