use std::path::PathBuf;

/// Errors raised while reading a dataset from disk.
///
/// `row` is the 1-based line number for CSV input and the 1-based record
/// index for JSON and Parquet input.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("row {row}: expected {expected} fields, found {found}")]
    MalformedRow {
        row: u64,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column '{column}': missing value")]
    MissingValue { row: u64, column: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NonNumeric {
        row: u64,
        column: String,
        value: String,
    },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("series '{label}': x values must be strictly increasing (index {index})")]
    NonMonotonicX { label: String, index: usize },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
