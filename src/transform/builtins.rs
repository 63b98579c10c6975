use super::columns::ColumnFn;
use crate::table::float_to_i64;
use serde_json::Value;

/// Names accepted by [`builtin`].
pub const BUILTIN_NAMES: &[&str] = &["int", "float", "str", "upper", "lower", "trim"];

fn to_int(value: &Value) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Number(n) if n.is_i64() => Ok(value.clone()),
        Value::Number(n) => n
            .as_f64()
            .and_then(float_to_i64)
            .map(Value::from)
            .ok_or_else(|| format!("cannot convert {n} to int")),
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| format!("invalid literal for int: '{s}' ({e})")),
        other => Err(format!("cannot convert {other} to int")),
    }
}

fn to_float(value: &Value) -> Result<Value, String> {
    let parsed = match value {
        Value::Null => return Ok(Value::Null),
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| format!("cannot convert {value} to float"))
}

fn to_str(value: &Value) -> Result<Value, String> {
    Ok(match value {
        Value::Null => Value::Null,
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    })
}

fn map_text(value: &Value, f: impl Fn(&str) -> String) -> Result<Value, String> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(f(s))),
        other => Err(format!("expected text, found {other}")),
    }
}

/// Looks up a named cell function for config-driven jobs. Null cells pass
/// through every built-in unchanged.
pub fn builtin(name: &str) -> Option<ColumnFn> {
    let f: ColumnFn = match name.trim().to_lowercase().as_str() {
        "int" => Box::new(to_int),
        "float" => Box::new(to_float),
        "str" => Box::new(to_str),
        "upper" => Box::new(|v: &Value| map_text(v, str::to_uppercase)),
        "lower" => Box::new(|v: &Value| map_text(v, str::to_lowercase)),
        "trim" => Box::new(|v: &Value| map_text(v, |s| s.trim().to_string())),
        _ => return None,
    };
    Some(f)
}
