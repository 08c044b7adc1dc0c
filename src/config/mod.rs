//! Configuration for CSV ingestion and date parsing.

/// Default batch size for CSV reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Helper function to get batch size from environment
#[must_use]
pub fn batch_size_from_env() -> Option<usize> {
    std::env::var("BDG_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}

/// Configuration for the CSV reader
#[derive(Debug, Clone)]
pub struct CsvReadConfig {
    /// Whether the files carry a header row
    pub has_header: bool,
    /// Field delimiter
    pub delimiter: u8,
    /// Number of rows sampled for schema inference
    pub max_infer_records: usize,
    /// Rows per record batch
    pub batch_size: usize,
    /// Date format configuration for string-to-timestamp conversions
    pub date_parse_config: DateParseConfig,
}

impl Default for CsvReadConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            max_infer_records: 1000,
            batch_size: batch_size_from_env().unwrap_or(DEFAULT_BATCH_SIZE),
            date_parse_config: DateParseConfig::default(),
        }
    }
}

/// Configuration for date format handling
///
/// The exports carry dates as day-first strings; ISO variants show up in
/// older extracts, so both families are tried in order. Values that match
/// no format become nulls and are excluded by the date-range filter.
#[derive(Debug, Clone)]
pub struct DateParseConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
}

impl Default for DateParseConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%d/%m/%Y %H:%M:%S".to_string(), // 15/01/2023 13:45:00
                "%d/%m/%Y".to_string(),          // 15/01/2023
                "%d-%m-%Y".to_string(),          // 15-01-2023
                "%Y-%m-%d %H:%M:%S".to_string(), // 2023-01-15 13:45:00
                "%Y-%m-%dT%H:%M:%S".to_string(), // 2023-01-15T13:45:00
                "%Y-%m-%d".to_string(),          // ISO: 2023-01-15
                "%d.%m.%Y".to_string(),          // 15.01.2023
                "%Y%m%d".to_string(),            // Compact: 20230115
            ],
        }
    }
}
