//! Row pruning on required fields and column type coercion.

use crate::errors::{AppError, AppResult};
use crate::models::ColumnType;
use crate::table::{float_to_i64, series_values};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

/// Validation applied by [`validate`]. Empty collections mean "not requested".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationRules {
    /// Columns that must exist; rows where all of them are null are dropped
    pub required: Vec<String>,
    /// Target type per column
    pub types: BTreeMap<String, ColumnType>,
}

impl ValidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    pub fn with_type(mut self, field: impl Into<String>, column_type: ColumnType) -> Self {
        self.types.insert(field.into(), column_type);
        self
    }
}

/// Checks that every field is a column, then drops rows where all of them are null.
///
/// # Errors
///
/// `MissingColumns` naming every absent field.
pub fn require_fields<S: AsRef<str>>(df: DataFrame, fields: &[S]) -> AppResult<DataFrame> {
    if fields.is_empty() {
        return Ok(df);
    }

    let missing: Vec<String> = fields
        .iter()
        .map(AsRef::as_ref)
        .filter(|f| df.get_column_index(f).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        error!(missing = ?missing, "Missing required columns");
        return Err(AppError::MissingColumns(missing));
    }

    let mut mask = BooleanChunked::full("valid", false, df.height());
    for field in fields {
        let present = df.column(field.as_ref())?.is_not_null();
        mask = &mask | &present;
    }

    let valid = df.filter(&mask)?;
    let dropped = df.height() - valid.height();
    if dropped > 0 {
        warn!(dropped, "Rows dropped because required fields were empty");
    }

    info!(
        valid = valid.height(),
        total = df.height(),
        "Required field validation completed"
    );
    Ok(valid)
}

fn coerce_integer(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(i64::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_to_i64))
            .map(Some)
            .ok_or_else(|| format!("{n} is out of range for an integer")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| format!("'{s}': {e}")),
        other => Err(format!("unsupported value {other}")),
    }
}

fn coerce_float(value: &Value) -> Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{n} is not representable")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| format!("'{s}': {e}")),
        other => Err(format!("unsupported value {other}")),
    }
}

fn coerce_string(value: &Value) -> Result<Option<String>, String> {
    Ok(crate::table::value_to_text(value))
}

fn coerce_boolean(value: &Value) -> Result<Option<bool>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(n) => Ok(Some(n.as_f64().map(|f| f != 0.0).unwrap_or(true))),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(format!("'{s}' is not a boolean")),
        },
        other => Err(format!("unsupported value {other}")),
    }
}

/// Casts every cell or fails; nothing is built unless all cells convert.
fn coerce_series(name: &str, values: &[Value], target: ColumnType) -> Result<Series, String> {
    let series = match target {
        ColumnType::Integer => Series::new(
            name,
            values.iter().map(coerce_integer).collect::<Result<Vec<_>, _>>()?,
        ),
        ColumnType::Float => Series::new(
            name,
            values.iter().map(coerce_float).collect::<Result<Vec<_>, _>>()?,
        ),
        ColumnType::String => Series::new(
            name,
            values.iter().map(coerce_string).collect::<Result<Vec<_>, _>>()?,
        ),
        ColumnType::Boolean => Series::new(
            name,
            values.iter().map(coerce_boolean).collect::<Result<Vec<_>, _>>()?,
        ),
    };
    Ok(series)
}

/// Casts each listed column to its target type.
///
/// Absent columns are skipped with a warning. The table is consumed so a failed
/// call never hands back a partially converted table.
///
/// # Errors
///
/// `ConversionFailed` for the first column holding a non-null value that does
/// not convert.
pub fn coerce_types<I, K, T>(mut df: DataFrame, field_types: I) -> AppResult<DataFrame>
where
    I: IntoIterator<Item = (K, T)>,
    K: AsRef<str>,
    T: Borrow<ColumnType>,
{
    for (field, target) in field_types {
        let field = field.as_ref();
        let target = *target.borrow();

        let Ok(series) = df.column(field) else {
            warn!(field, "Field not found in table");
            continue;
        };

        let values = series_values(series)?;
        let converted = coerce_series(field, &values, target).map_err(|reason| {
            error!(field, target = %target, error = %reason, "Failed to convert field");
            AppError::ConversionFailed {
                field: field.to_string(),
                target,
                reason,
            }
        })?;

        df.with_column(converted)?;
        info!(field, target = %target, "Field converted");
    }
    Ok(df)
}

/// Runs [`require_fields`] then [`coerce_types`], each only when its rules are
/// non-empty. Rows pruned for emptiness are never type-checked.
pub fn validate(df: DataFrame, rules: &ValidationRules) -> AppResult<DataFrame> {
    let mut df = df;
    if !rules.required.is_empty() {
        df = require_fields(df, &rules.required)?;
    }
    if !rules.types.is_empty() {
        df = coerce_types(df, &rules.types)?;
    }
    Ok(df)
}
