use crate::errors::AppResult;
use crate::table::{series_from_values, series_values};
use polars::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Unary function applied to every cell of a column.
pub type ColumnFn = Box<dyn Fn(&Value) -> Result<Value, String>>;

/// Ordered set of per-column functions.
#[derive(Default)]
pub struct Transforms {
    entries: Vec<(String, ColumnFn)>,
}

impl Transforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, column: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + 'static,
    {
        self.entries.push((column.into(), Box::new(f)));
        self
    }

    pub fn push(&mut self, column: impl Into<String>, f: ColumnFn) {
        self.entries.push((column.into(), f));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFn)> {
        self.entries.iter().map(|(c, f)| (c.as_str(), f))
    }
}

impl fmt::Debug for Transforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(c, _)| c))
            .finish()
    }
}

/// Renames columns according to `mapping`.
///
/// All renames happen at once, so a mapping may swap two names. Keys that are
/// not columns of the table are ignored.
pub fn rename_columns<K, V>(df: DataFrame, mapping: &HashMap<K, V>) -> AppResult<DataFrame>
where
    K: AsRef<str> + Eq + std::hash::Hash,
    V: AsRef<str>,
{
    let lookup: HashMap<&str, &str> = mapping
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_ref()))
        .collect();

    let mut applied = Vec::new();
    let columns: Vec<Series> = df
        .get_columns()
        .iter()
        .map(|series| {
            let mut series = series.clone();
            let old = series.name().to_string();
            if let Some(new) = lookup.get(old.as_str()) {
                series.rename(new);
                applied.push(format!("{old} -> {new}"));
            }
            series
        })
        .collect();

    for key in lookup.keys() {
        if df.get_column_index(key).is_none() {
            debug!(column = *key, "Rename source column not present, skipping");
        }
    }

    let renamed = DataFrame::new(columns)?;
    info!(renames = ?applied, "Renamed columns");
    Ok(renamed)
}

/// Applies each function element-wise to its column.
///
/// A column is replaced only if the function succeeds for every cell; on the
/// first failure a warning is logged and that column is left untouched. Missing
/// columns are skipped with a warning. Neither case fails the call.
pub fn apply_transforms(mut df: DataFrame, transforms: &Transforms) -> AppResult<DataFrame> {
    for (column, f) in transforms.iter() {
        let Ok(series) = df.column(column) else {
            warn!(column, "Column not found for transformation");
            continue;
        };

        let values = series_values(series)?;
        let transformed: Result<Vec<Value>, String> = values.iter().map(|v| f(v)).collect();

        match transformed {
            Ok(new_values) => {
                df.with_column(series_from_values(column, &new_values))?;
                info!(column, "Applied transformation to column");
            }
            Err(reason) => {
                warn!(column, error = %reason, "Failed to transform column");
            }
        }
    }
    Ok(df)
}
