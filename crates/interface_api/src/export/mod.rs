//! Tabular export pipeline
//!
//! Consumers (spreadsheet, CSV, PDF writers) all take the same flat
//! row projection plus a column configuration. Only CSV is rendered
//! here; spreadsheet and PDF encoders consume the rows as-is.

pub mod columns;
pub mod csv;

pub use columns::{bill_columns, patient_columns, ExportColumn};
pub use csv::to_csv;

use serde::{Deserialize, Serialize};

/// Requested download format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}
