//! Writing tables to CSV, Excel, Parquet and SQLite destinations.
//!
//! Every sink rejects an empty table before touching the filesystem or the
//! connection. File sinks create the destination's parent directory. Failures
//! from the underlying writer are logged with the destination and returned
//! unchanged; nothing is retried.

pub mod csv_writer;
pub mod excel_writer;
pub mod parquet_writer;
pub mod sql_writer;

pub use csv_writer::export_to_csv;
pub use excel_writer::export_to_excel;
pub use parquet_writer::export_to_parquet;
pub use sql_writer::export_to_sql;

use crate::constants::INDEX_COLUMN;
use crate::errors::{AppError, AppResult};
use crate::table::{is_empty_table, with_index_column};
use polars::prelude::DataFrame;
use std::fs;
use std::path::Path;
use tracing::error;

/// Options shared by the file sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write a leading 0-based `index` column
    pub index: bool,
}

pub(crate) fn ensure_not_empty(df: &DataFrame, sink: &str) -> AppResult<()> {
    if is_empty_table(df) {
        error!(sink, "Attempted to export an empty table");
        return Err(AppError::EmptyInput(format!(
            "Cannot export an empty table to {sink}"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// The table as it should be written, with the index column when requested.
pub(crate) fn prepare(df: &DataFrame, options: &ExportOptions) -> AppResult<DataFrame> {
    if options.index {
        with_index_column(df, INDEX_COLUMN)
    } else {
        Ok(df.clone())
    }
}
