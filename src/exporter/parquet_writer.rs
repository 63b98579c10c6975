use super::{ensure_not_empty, ensure_parent_dir};
use crate::errors::AppResult;
use polars::prelude::*;
use std::fs::{self as std_fs, File};
use std::path::Path;
use tracing::{error, info};

/// Writes the table as a Parquet file.
///
/// # Errors
///
/// `EmptyInput` for an empty table, otherwise the I/O or polars error.
pub fn export_to_parquet(df: &DataFrame, output_path: impl AsRef<Path>) -> AppResult<()> {
    let path = output_path.as_ref();
    ensure_not_empty(df, "Parquet")?;

    let bytes = write_parquet(df, path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to export table to Parquet");
        e
    })?;

    info!(
        path = %path.display(),
        rows = df.height(),
        size_bytes = bytes,
        "Table exported to Parquet"
    );
    Ok(())
}

fn write_parquet(df: &DataFrame, path: &Path) -> AppResult<u64> {
    ensure_parent_dir(path)?;
    let mut out = df.clone();

    let mut file = File::create(path)?;
    ParquetWriter::new(&mut file).finish(&mut out)?;

    Ok(std_fs::metadata(path)?.len())
}
