//! Config-driven jobs: load, reshape, validate and export in one call.

use crate::config::{JobConfig, OutputConfig, TransformConfig};
use crate::errors::{AppError, AppResult};
use crate::exporter::{
    export_to_csv, export_to_excel, export_to_parquet, export_to_sql, ExportOptions,
};
use crate::models::{InputFormat, ParseMode, Record};
use crate::parser::{load_json_file, load_json_file_safe, load_multiple_xml};
use crate::transform::{
    apply_transforms, builtin, json_file_records, records_to_table, rename_columns, xml_records,
    Transforms,
};
use crate::utils::format_duration;
use crate::validator::validate;
use polars::prelude::DataFrame;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    /// Input files that were found (including any skipped in safe mode)
    pub files: usize,
    pub rows: usize,
    pub columns: usize,
    pub destination: String,
}

/// Runs a job end to end.
///
/// Inputs are the explicit paths followed by the files found under the input
/// directory. In safe mode unreadable files are skipped; in strict mode the
/// first failure aborts the job before anything is written.
///
/// # Errors
///
/// `InvalidInput` when no input file is found, plus any error raised by the
/// loading, validation or export stages.
pub fn run_job(config: &JobConfig) -> AppResult<JobSummary> {
    let start = Instant::now();

    let paths = config.input.resolve_paths()?;
    if paths.is_empty() {
        return Err(AppError::InvalidInput("No input files found".into()));
    }
    info!(
        format = config.input.format.display_name(),
        files = paths.len(),
        mode = ?config.input.mode(),
        "Starting job"
    );

    let df = load_table(
        &paths,
        config.input.format,
        config.input.record_tag.as_deref(),
        config.input.mode(),
    )?;
    let df = reshape(df, &config.transform)?;
    let df = validate(df, &config.validate)?;

    export(&df, &config.output)?;

    let summary = JobSummary {
        files: paths.len(),
        rows: df.height(),
        columns: df.width(),
        destination: config.output.destination(),
    };
    info!(
        rows = summary.rows,
        columns = summary.columns,
        destination = %summary.destination,
        elapsed = %format_duration(start.elapsed()),
        "Job completed"
    );
    Ok(summary)
}

/// Loads every input and assembles one flattened table.
///
/// XML input needs `record_tag`; a missing tag is `InvalidInput`.
pub fn load_table(
    paths: &[PathBuf],
    format: InputFormat,
    record_tag: Option<&str>,
    mode: ParseMode,
) -> AppResult<DataFrame> {
    let records: Vec<Record> = match format {
        InputFormat::Json => {
            let mut records = Vec::new();
            let mut loaded = 0;
            for path in paths {
                let document = match mode {
                    ParseMode::Strict => load_json_file(path)?,
                    ParseMode::Safe => match load_json_file_safe(path) {
                        Some(document) => document,
                        None => continue,
                    },
                };
                records.extend(json_file_records(path, &document)?);
                loaded += 1;
            }
            info!(requested = paths.len(), loaded, "Loaded JSON files");
            records
        }
        InputFormat::Xml => {
            let tag = record_tag
                .ok_or_else(|| AppError::InvalidInput("XML input requires a record tag".into()))?;
            load_multiple_xml(paths, mode)?
                .iter()
                .flat_map(|root| xml_records(root, tag))
                .collect()
        }
    };

    debug!(records = records.len(), "Collected records");
    records_to_table(&records)
}

fn reshape(df: DataFrame, transform: &TransformConfig) -> AppResult<DataFrame> {
    let df = rename_columns(df, &transform.rename)?;

    let mut transforms = Transforms::new();
    for (column, name) in &transform.functions {
        let f = builtin(name).ok_or_else(|| {
            AppError::InvalidConfig(format!("Unknown function '{name}' for column '{column}'"))
        })?;
        transforms.push(column.clone(), f);
    }

    if transforms.is_empty() {
        Ok(df)
    } else {
        apply_transforms(df, &transforms)
    }
}

/// Writes the table to the sink named by `output`.
pub fn export(df: &DataFrame, output: &OutputConfig) -> AppResult<()> {
    match output {
        OutputConfig::Csv { path, index } => {
            export_to_csv(df, path, &ExportOptions { index: *index })
        }
        OutputConfig::Excel { path, index } => {
            export_to_excel(df, path, &ExportOptions { index: *index })
        }
        OutputConfig::Parquet { path } => export_to_parquet(df, path),
        OutputConfig::Sql {
            database,
            table,
            if_exists,
        } => {
            crate::exporter::ensure_parent_dir(database)?;
            let conn = Connection::open(database)?;
            export_to_sql(df, &conn, table, *if_exists)
        }
    }
}

/// Picks a file sink from the output extension (`csv`, `xlsx`, `parquet`).
pub fn output_for_path(path: &Path, index: bool) -> AppResult<OutputConfig> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let path = path.to_path_buf();
    match extension.as_str() {
        "csv" => Ok(OutputConfig::Csv { path, index }),
        "xlsx" => Ok(OutputConfig::Excel { path, index }),
        "parquet" => Ok(OutputConfig::Parquet { path }),
        other => Err(AppError::InvalidInput(format!(
            "Unsupported output extension '{other}' (expected csv, xlsx or parquet)"
        ))),
    }
}
