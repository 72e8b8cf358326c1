//! Error types for eda-report.
//!
//! Statistical edge cases (empty columns, zero variance, too few values)
//! are not errors: they surface as NaN sentinels or placeholder labels.
//! Errors are reserved for malformed input, I/O and configuration problems.

use thiserror::Error;

/// All errors produced by eda-report operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// CSV parsing failed.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },
    /// Spreadsheet could not be opened or a sheet could not be read.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    /// Input file extension is not a supported table format.
    #[error("unsupported input format '{0}' (expected csv, tsv, xlsx, xlsm, xls or ods)")]
    UnsupportedFormat(String),
    /// Column not found in DataFrame.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },
    /// Column length does not match the table's row count.
    #[error("expected {expected} rows, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A histogram figure could not be rendered.
    #[error("failed to render figure for column '{column}': {message}")]
    Render { column: String, message: String },
    /// I/O error during file reading or writing.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ProfileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<toml::de::Error> for ProfileError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Io(format!("JSON serialization: {e}"))
    }
}
