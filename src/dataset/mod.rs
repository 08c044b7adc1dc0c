//! Source dataset layouts and detection
//!
//! The program exports arrive as two CSV layouts: the loan application
//! roster ("nomina") feeding the global and rejection views, and the
//! collections extract ("recupero") feeding the recovery view. This module
//! centralizes their column names, detects which layout a file carries and
//! checks a loaded schema against the expected columns.

use arrow::datatypes::Schema;
use log::debug;
use serde::Serialize;

use crate::error::{Error, Result};

/// Column names shared by the source exports
pub mod columns {
    /// Form submission date (nomina)
    pub const FEC_FORM: &str = "FEC_FORM";
    /// First payment date (nomina)
    pub const FEC_INICIO_PAGO: &str = "FEC_INICIO_PAGO";
    /// Last payment date (nomina)
    pub const FEC_FIN_PAGO: &str = "FEC_FIN_PAGO";
    /// Rejection date (nomina)
    pub const FEC_RECHAZO: &str = "FEC_RECHAZO";
    /// Ingestion date (recupero)
    pub const FECHA_INGRESO: &str = "FECHA_INGRESO";
    /// Collection window start (recupero)
    pub const FEC_INICIO: &str = "FEC_INICIO";
    /// Collection window end (recupero)
    pub const FEC_FIN: &str = "FEC_FIN";
    /// Loan state identifier
    pub const ID_ESTADO_PRESTAMO: &str = "ID_ESTADO_PRESTAMO";
    /// Loan state display name
    pub const N_ESTADO_PRESTAMO: &str = "N_ESTADO_PRESTAMO";
    /// Loan line display name
    pub const N_LINEA_PRESTAMO: &str = "N_LINEA_PRESTAMO";
    /// Rejection line display name
    pub const N_LINEA_RECHAZO: &str = "N_LINEA_RECHAZO";
    /// Locality display name
    pub const N_LOCALIDAD: &str = "N_LOCALIDAD";
    /// Department display name
    pub const N_DEPARTAMENTO: &str = "N_DEPARTAMENTO";
}

/// Dataset layout identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dataset {
    /// Loan application roster; feeds the global and rejection views
    Nomina,
    /// Collections extract; feeds the recovery view
    Recupero,
    /// Unrecognized layout
    Unknown,
}

impl Dataset {
    /// Convert `Dataset` to static string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dataset::Nomina => "nomina",
            Dataset::Recupero => "recupero",
            Dataset::Unknown => "unknown",
        }
    }

    /// Look up a dataset by name
    ///
    /// # Errors
    /// Returns [`Error::UnknownDataset`] for names that match no layout
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "nomina" => Ok(Dataset::Nomina),
            "recupero" => Ok(Dataset::Recupero),
            _ => Err(Error::UnknownDataset {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Columns expected in this layout
    #[must_use]
    pub const fn expected_columns(&self) -> &'static [&'static str] {
        match self {
            Dataset::Nomina => &[
                columns::FEC_FORM,
                columns::ID_ESTADO_PRESTAMO,
                columns::N_ESTADO_PRESTAMO,
                columns::N_LINEA_PRESTAMO,
                columns::N_LOCALIDAD,
            ],
            Dataset::Recupero => &[
                columns::FECHA_INGRESO,
                columns::ID_ESTADO_PRESTAMO,
                columns::N_ESTADO_PRESTAMO,
                columns::N_LOCALIDAD,
            ],
            Dataset::Unknown => &[],
        }
    }

    /// Columns that hold dates and are parsed to timestamps at load
    #[must_use]
    pub const fn date_columns(&self) -> &'static [&'static str] {
        match self {
            Dataset::Nomina => &[
                columns::FEC_FORM,
                columns::FEC_INICIO_PAGO,
                columns::FEC_FIN_PAGO,
                columns::FEC_RECHAZO,
            ],
            Dataset::Recupero => &[
                columns::FECHA_INGRESO,
                columns::FEC_INICIO,
                columns::FEC_FIN,
                columns::FEC_RECHAZO,
            ],
            Dataset::Unknown => &[],
        }
    }
}

impl From<&str> for Dataset {
    fn from(s: &str) -> Self {
        Self::from_name(s).unwrap_or(Dataset::Unknown)
    }
}

/// Detect the dataset layout from a schema
///
/// Each layout is recognized by a characteristic column: the collections
/// extract always carries the ingestion date, the roster always carries the
/// form date or the rejection date.
///
/// # Arguments
///
/// * `schema` - The schema to examine
///
/// # Returns
///
/// The detected layout, `Dataset::Unknown` if nothing matches
#[must_use]
pub fn detect_dataset(schema: &Schema) -> Dataset {
    let dataset = if schema.field_with_name(columns::FECHA_INGRESO).is_ok() {
        Dataset::Recupero
    } else if schema.field_with_name(columns::FEC_FORM).is_ok()
        || schema.field_with_name(columns::FEC_RECHAZO).is_ok()
    {
        Dataset::Nomina
    } else {
        Dataset::Unknown
    };

    debug!("Detected dataset layout: {}", dataset.as_str());
    dataset
}

/// A struct that represents how well a loaded file matches its layout
#[derive(Debug, Serialize)]
pub struct SchemaReport {
    /// The layout the file was checked against
    pub dataset: Dataset,
    /// Whether every expected column is present
    pub compatible: bool,
    /// List of problems, if any
    pub issues: Vec<SchemaIssue>,
}

/// A single schema problem
#[derive(Debug, Serialize)]
pub struct SchemaIssue {
    /// The column the issue concerns
    pub column: String,
    /// Description of the issue
    pub description: String,
}

/// Check a loaded schema against the columns its layout is expected to carry
///
/// Missing columns are reported as issues, not errors: the views degrade the
/// dependent sections instead of refusing the whole file.
#[must_use]
pub fn check_schema(dataset: Dataset, schema: &Schema) -> SchemaReport {
    let mut issues = Vec::new();

    for column in dataset.expected_columns() {
        if schema.field_with_name(column).is_err() {
            issues.push(SchemaIssue {
                column: (*column).to_string(),
                description: format!("expected column '{column}' missing from file"),
            });
        }
    }

    SchemaReport {
        dataset,
        compatible: issues.is_empty(),
        issues,
    }
}
