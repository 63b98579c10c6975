use super::flatten::records_to_table;
use crate::errors::AppResult;
use crate::models::Record;
use crate::parser::{load_xml_file, XmlElement};
use polars::prelude::DataFrame;
use serde_json::Value;
use std::path::Path;
use tracing::{error, info};

/// Builds one record per descendant named `record_tag`.
///
/// Only the direct children of each matched element are read (child tag →
/// child text, null when the child has no text). Grandchildren are not
/// flattened.
pub fn xml_records(root: &XmlElement, record_tag: &str) -> Vec<Record> {
    root.find_all(record_tag)
        .into_iter()
        .map(|element| {
            let mut record = Record::new();
            for child in &element.children {
                let text = child.text.clone().map(Value::String).unwrap_or(Value::Null);
                record.insert(child.tag.clone(), text);
            }
            record
        })
        .collect()
}

/// Converts the records found under `root` into a table.
pub fn xml_to_table(root: &XmlElement, record_tag: &str) -> AppResult<DataFrame> {
    records_to_table(&xml_records(root, record_tag))
}

/// Loads an XML file (strict) and converts its `record_tag` elements into a table.
pub fn xml_file_to_table(path: impl AsRef<Path>, record_tag: &str) -> AppResult<DataFrame> {
    let path = path.as_ref();
    let root = load_xml_file(path)?;

    let df = xml_to_table(&root, record_tag).map_err(|e| {
        error!(
            path = %path.display(),
            record_tag,
            error = %e,
            "Failed to convert XML file to table"
        );
        e
    })?;

    info!(
        path = %path.display(),
        record_tag,
        rows = df.height(),
        columns = df.width(),
        "Converted XML file to table"
    );
    Ok(df)
}
