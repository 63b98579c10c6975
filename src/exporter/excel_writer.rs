use super::{ensure_not_empty, ensure_parent_dir, prepare, ExportOptions};
use crate::constants::DEFAULT_SHEET_NAME;
use crate::errors::{AppError, AppResult};
use crate::table::{column_names, table_rows};
use polars::prelude::DataFrame;
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::path::Path;
use tracing::{error, info};

/// Writes the table to a single-sheet `.xlsx` workbook.
///
/// Booleans and numbers are stored as native cells, nulls are left blank.
///
/// # Errors
///
/// `EmptyInput` for an empty table, otherwise the I/O or workbook error.
pub fn export_to_excel(
    df: &DataFrame,
    output_path: impl AsRef<Path>,
    options: &ExportOptions,
) -> AppResult<()> {
    let path = output_path.as_ref();
    ensure_not_empty(df, "Excel")?;

    write_workbook(df, path, DEFAULT_SHEET_NAME, options).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to export table to Excel");
        e
    })?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Table exported to Excel"
    );
    Ok(())
}

fn write_workbook(
    df: &DataFrame,
    path: &Path,
    sheet_name: &str,
    options: &ExportOptions,
) -> AppResult<()> {
    ensure_parent_dir(path)?;
    let table = prepare(df, options)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, header) in column_names(&table).iter().enumerate() {
        worksheet.write_string(0, column_index(col_idx)?, header)?;
    }

    for (row_idx, row) in table_rows(&table)?.iter().enumerate() {
        let row_num = row_index(row_idx + 1)?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = column_index(col_idx)?;
            match cell {
                Value::Null => {}
                Value::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                Value::Number(n) => {
                    worksheet.write_number(row_num, col, n.as_f64().unwrap_or_default())?;
                }
                Value::String(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                other => {
                    worksheet.write_string(row_num, col, other.to_string())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn column_index(idx: usize) -> AppResult<u16> {
    u16::try_from(idx).map_err(|_| {
        AppError::InvalidInput(format!("Column {idx} is beyond the worksheet column limit"))
    })
}

fn row_index(idx: usize) -> AppResult<u32> {
    u32::try_from(idx)
        .map_err(|_| AppError::InvalidInput(format!("Row {idx} is beyond the worksheet row limit")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_workbook_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/people.xlsx");
        let df = polars::df!("Name" => ["Alice", "Bob"], "Age" => [25i64, 30]).unwrap();

        export_to_excel(&df, &path, &ExportOptions::default()).unwrap();
        assert!(path.is_file());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn cell_indices_reject_values_that_do_not_fit() {
        assert_eq!(column_index(3).unwrap(), 3);
        assert_eq!(column_index(usize::from(u16::MAX)).unwrap(), u16::MAX);
        assert!(matches!(
            column_index(usize::from(u16::MAX) + 1),
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(row_index(1).unwrap(), 1);
        if let Ok(too_many) = usize::try_from(u64::from(u32::MAX) + 1) {
            assert!(matches!(row_index(too_many), Err(AppError::InvalidInput(_))));
        }
    }

    #[test]
    fn empty_table_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.xlsx");

        let result = export_to_excel(&DataFrame::default(), &path, &ExportOptions::default());
        assert!(matches!(result, Err(AppError::EmptyInput(_))));
        assert!(!path.exists());
    }
}
