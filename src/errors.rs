use crate::models::ColumnType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input path does not exist or is not a regular file
    #[error("File not found: {0}")]
    NotFound(String),
    /// Zero-length or whitespace-only input, or an empty table at export time
    #[error("Empty input: {0}")]
    EmptyInput(String),
    /// JSON or XML content could not be parsed
    #[error("Malformed input in {path}: {reason}")]
    MalformedInput { path: String, reason: String },
    /// One or more required columns are absent; lists every missing column
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// A non-null value could not be cast to the target column type
    #[error("Failed to convert field '{field}' to {target}: {reason}")]
    ConversionFailed {
        field: String,
        target: ColumnType,
        reason: String,
    },
    /// SQL destination table exists and the policy is `fail`
    #[error("Table '{0}' already exists")]
    TableExists(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
