use super::{ensure_not_empty, ensure_parent_dir, prepare, ExportOptions};
use crate::constants::UTF8_BOM;
use crate::errors::AppResult;
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

/// Writes the table as UTF-8 CSV with a byte-order mark and a header row.
///
/// # Errors
///
/// `EmptyInput` for an empty table (checked before any I/O), otherwise the
/// I/O or polars error raised while writing.
pub fn export_to_csv(
    df: &DataFrame,
    output_path: impl AsRef<Path>,
    options: &ExportOptions,
) -> AppResult<()> {
    let path = output_path.as_ref();
    ensure_not_empty(df, "CSV")?;

    write_csv(df, path, options).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to export table to CSV");
        e
    })?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Table exported to CSV"
    );
    Ok(())
}

fn write_csv(df: &DataFrame, path: &Path, options: &ExportOptions) -> AppResult<()> {
    ensure_parent_dir(path)?;
    let mut out = prepare(df, options)?;

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    CsvWriter::new(&mut file).finish(&mut out)?;
    file.flush()?;
    Ok(())
}
