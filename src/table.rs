//! Conversions between flat records and the polars `DataFrame` used as the table.
//!
//! Cells travel through transforms and validation as `serde_json::Value` scalars.
//! Column dtypes are inferred from the non-null values of each column:
//! booleans become `Boolean`, integral numbers `Int64`, other numbers `Float64`,
//! and everything else `String` (non-string scalars and arrays as JSON text).

use crate::errors::AppResult;
use crate::models::FlatRecord;
use polars::prelude::*;
use serde_json::{Number, Value};
use std::collections::HashSet;

/// True when the table has no rows or no columns.
pub fn is_empty_table(df: &DataFrame) -> bool {
    df.height() == 0 || df.width() == 0
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Builds a series from JSON scalars, inferring the narrowest dtype that holds them.
pub fn series_from_values(name: &str, values: &[Value]) -> Series {
    let mut non_null = values.iter().filter(|v| !v.is_null()).peekable();

    if non_null.peek().is_none() {
        return Series::new(name, vec![None::<String>; values.len()]);
    }

    if values.iter().all(|v| v.is_null() || v.is_boolean()) {
        let data: Vec<Option<bool>> = values.iter().map(Value::as_bool).collect();
        return Series::new(name, data);
    }

    if values.iter().all(|v| v.is_null() || v.is_i64()) {
        let data: Vec<Option<i64>> = values.iter().map(Value::as_i64).collect();
        return Series::new(name, data);
    }

    if values.iter().all(|v| v.is_null() || v.is_number()) {
        let data: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
        return Series::new(name, data);
    }

    let data: Vec<Option<String>> = values.iter().map(value_to_text).collect();
    Series::new(name, data)
}

/// Truncates a float toward zero when the result fits in an `i64`.
pub(crate) fn float_to_i64(value: f64) -> Option<i64> {
    (value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64)
        .then(|| value.trunc() as i64)
}

/// Renders a scalar as cell text; `None` for null.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),
        AnyValue::Int32(v) => Value::from(v),
        AnyValue::Int64(v) => Value::from(v),
        AnyValue::UInt32(v) => Value::from(v),
        AnyValue::UInt64(v) => Value::from(v),
        AnyValue::Float32(v) => float_value(f64::from(v)),
        AnyValue::Float64(v) => float_value(v),
        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),
        other => Value::String(other.to_string()),
    }
}

/// Reads every cell of a series as a JSON scalar, in row order.
pub fn series_values(series: &Series) -> AppResult<Vec<Value>> {
    let mut out = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        out.push(any_value_to_json(series.get(idx)?));
    }
    Ok(out)
}

/// Row-major view of the table, used by sinks that write cell by cell.
pub fn table_rows(df: &DataFrame) -> AppResult<Vec<Vec<Value>>> {
    let columns = df
        .get_columns()
        .iter()
        .map(series_values)
        .collect::<AppResult<Vec<_>>>()?;

    let rows = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|col| col.get(row).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();
    Ok(rows)
}

/// Assembles flat records into a table.
///
/// Columns are the union of all keys in first-seen order; a record lacking a
/// column gets a null cell. Row order follows the input.
pub fn table_from_rows(rows: &[FlatRecord]) -> AppResult<DataFrame> {
    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        for key in row.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }

    let series: Vec<Series> = columns
        .iter()
        .map(|name| {
            let values: Vec<Value> = rows
                .iter()
                .map(|row| row.get(name).cloned().unwrap_or(Value::Null))
                .collect();
            series_from_values(name, &values)
        })
        .collect();

    Ok(DataFrame::new(series)?)
}

/// Returns a copy of the table with a leading 0-based `index` column.
pub fn with_index_column(df: &DataFrame, name: &str) -> AppResult<DataFrame> {
    let index: Vec<i64> = (0..df.height() as i64).collect();
    let mut columns = Vec::with_capacity(df.width() + 1);
    columns.push(Series::new(name, index));
    columns.extend(df.get_columns().iter().cloned());
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: Value) -> FlatRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn float_to_i64_truncates_within_range_only() {
        assert_eq!(float_to_i64(7.9), Some(7));
        assert_eq!(float_to_i64(-7.9), Some(-7));
        assert_eq!(float_to_i64(i64::MIN as f64), Some(i64::MIN));
        assert_eq!(float_to_i64(i64::MAX as f64), None);
        assert_eq!(float_to_i64(1e20), None);
        assert_eq!(float_to_i64(f64::NAN), None);
        assert_eq!(float_to_i64(f64::INFINITY), None);
    }

    #[test]
    fn infers_dtypes_from_values() {
        let ints = series_from_values("a", &[json!(1), Value::Null, json!(3)]);
        assert_eq!(ints.dtype(), &DataType::Int64);
        assert_eq!(ints.null_count(), 1);

        let floats = series_from_values("b", &[json!(1), json!(2.5)]);
        assert_eq!(floats.dtype(), &DataType::Float64);

        let bools = series_from_values("c", &[json!(true), json!(false)]);
        assert_eq!(bools.dtype(), &DataType::Boolean);

        let mixed = series_from_values("d", &[json!("25"), json!(30), json!([1, 2])]);
        assert_eq!(mixed.dtype(), &DataType::String);
        assert_eq!(
            series_values(&mixed).unwrap(),
            vec![json!("25"), json!("30"), json!("[1,2]")]
        );

        let nulls = series_from_values("e", &[Value::Null, Value::Null]);
        assert_eq!(nulls.len(), 2);
        assert_eq!(nulls.null_count(), 2);
    }

    #[test]
    fn table_from_rows_unions_columns_in_first_seen_order() {
        let rows = vec![
            flat(json!({"Name": "Alice", "Age": 25})),
            flat(json!({"Email": "bob@test.com", "Name": "Bob"})),
        ];

        let df = table_from_rows(&rows).unwrap();
        assert_eq!(column_names(&df), vec!["Name", "Age", "Email"]);
        assert_eq!(df.height(), 2);

        let age = series_values(df.column("Age").unwrap()).unwrap();
        assert_eq!(age, vec![json!(25), Value::Null]);
        let email = series_values(df.column("Email").unwrap()).unwrap();
        assert_eq!(email, vec![Value::Null, json!("bob@test.com")]);
    }

    #[test]
    fn table_from_no_rows_is_empty() {
        let df = table_from_rows(&[]).unwrap();
        assert!(is_empty_table(&df));
    }

    #[test]
    fn table_rows_is_row_major() {
        let rows = vec![flat(json!({"a": 1, "b": "x"})), flat(json!({"a": 2}))];
        let df = table_from_rows(&rows).unwrap();

        let out = table_rows(&df).unwrap();
        assert_eq!(out, vec![vec![json!(1), json!("x")], vec![json!(2), Value::Null]]);
    }

    #[test]
    fn with_index_column_prepends_positions() {
        let rows = vec![flat(json!({"a": "x"})), flat(json!({"a": "y"}))];
        let df = table_from_rows(&rows).unwrap();

        let indexed = with_index_column(&df, "index").unwrap();
        assert_eq!(column_names(&indexed), vec!["index", "a"]);
        assert_eq!(
            series_values(indexed.column("index").unwrap()).unwrap(),
            vec![json!(0), json!(1)]
        );
    }
}
