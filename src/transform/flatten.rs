use crate::constants::KEY_SEPARATOR;
use crate::errors::{AppError, AppResult};
use crate::models::{FlatRecord, Record};
use crate::parser::load_json_file;
use crate::table::table_from_rows;
use polars::prelude::DataFrame;
use serde_json::Value;
use std::path::Path;
use tracing::{error, info};

/// Flattens a nested record into dot-joined keys.
///
/// Nested objects are recursed into; every other value, arrays included, is
/// copied as-is under the joined key.
pub fn flatten(record: &Record, prefix: &str) -> FlatRecord {
    let mut flat = FlatRecord::new();
    flatten_into(record, prefix, &mut flat);
    flat
}

fn flatten_into(record: &Record, prefix: &str, out: &mut FlatRecord) {
    for (key, value) in record {
        let joined = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{KEY_SEPARATOR}{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &joined, out),
            other => {
                out.insert(joined, other.clone());
            }
        }
    }
}

/// Flattens each record and assembles the rows into a table.
pub fn records_to_table(records: &[Record]) -> AppResult<DataFrame> {
    let rows: Vec<FlatRecord> = records.iter().map(|r| flatten(r, "")).collect();
    let df = table_from_rows(&rows)?;
    info!(
        rows = df.height(),
        columns = df.width(),
        "Converted records to table"
    );
    Ok(df)
}

/// Splits a decoded JSON document into records.
///
/// A top-level object is one record; an array yields one record per element.
///
/// # Errors
///
/// `MalformedInput` for scalars at the top level or non-object array elements.
pub fn json_value_to_records(value: &Value) -> AppResult<Vec<Record>> {
    split_records(value, "<document>")
}

/// Like [`json_value_to_records`] for a document read from `path`; errors name
/// the file (and the offending array index) and are logged.
pub fn json_file_records(path: &Path, value: &Value) -> AppResult<Vec<Record>> {
    split_records(value, &path.display().to_string()).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to split JSON document into records");
        e
    })
}

fn split_records(value: &Value, source: &str) -> AppResult<Vec<Record>> {
    match value {
        Value::Object(map) => Ok(vec![map.clone()]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                item.as_object().cloned().ok_or_else(|| AppError::MalformedInput {
                    path: format!("{source}[{idx}]"),
                    reason: "array element is not a JSON object".to_string(),
                })
            })
            .collect(),
        _ => Err(AppError::MalformedInput {
            path: source.to_string(),
            reason: "top-level JSON value must be an object or an array".to_string(),
        }),
    }
}

/// Converts decoded JSON documents into one table.
pub fn json_to_table(documents: &[Value]) -> AppResult<DataFrame> {
    let mut records = Vec::new();
    for document in documents {
        records.extend(json_value_to_records(document)?);
    }
    records_to_table(&records)
}

/// Loads a JSON file (strict) and converts it into a flattened table.
pub fn json_file_to_table(path: impl AsRef<Path>) -> AppResult<DataFrame> {
    let path = path.as_ref();
    let document = load_json_file(path)?;
    info!(path = %path.display(), "Loaded JSON file");
    let records = json_file_records(path, &document)?;
    records_to_table(&records).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to convert JSON data to table");
        e
    })
}
