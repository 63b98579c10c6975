use crate::constants::*;
use crate::errors::AppError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A decoded JSON object or the direct children of an XML record element.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A single-level record whose keys are dot-joined paths. No value is an object.
pub type FlatRecord = serde_json::Map<String, serde_json::Value>;

/// Target scalar type for column coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColumnType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_lowercase();
        let lower = lower.as_str();

        if INTEGER_ALIASES.contains(&lower) {
            Ok(Self::Integer)
        } else if FLOAT_ALIASES.contains(&lower) {
            Ok(Self::Float)
        } else if STRING_ALIASES.contains(&lower) {
            Ok(Self::String)
        } else if BOOLEAN_ALIASES.contains(&lower) {
            Ok(Self::Boolean)
        } else {
            Err(AppError::InvalidInput(format!("Unknown column type: {value}")))
        }
    }
}

impl TryFrom<String> for ColumnType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What the SQL sink does when the destination table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingTablePolicy {
    Fail,
    #[default]
    Replace,
    Append,
}

impl ExistingTablePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

impl FromStr for ExistingTablePolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "replace" => Ok(Self::Replace),
            "append" => Ok(Self::Append),
            other => Err(AppError::InvalidInput(format!(
                "Unknown existing-table policy: {other} (expected fail, replace or append)"
            ))),
        }
    }
}

/// Failure policy for parsing: raise a typed error, or log it and yield no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    Strict,
    #[default]
    Safe,
}

/// Structured input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    Xml,
}

impl InputFormat {
    /// File extensions collected when scanning a directory for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Json => JSON_EXTENSIONS,
            Self::Xml => XML_EXTENSIONS,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
        }
    }
}

impl FromStr for InputFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(AppError::InvalidInput(format!(
                "Unknown input format: {other} (expected json or xml)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_type_accepts_aliases() {
        assert_eq!("int".parse::<ColumnType>().unwrap(), ColumnType::Integer);
        assert_eq!(" Integer ".parse::<ColumnType>().unwrap(), ColumnType::Integer);
        assert_eq!("float".parse::<ColumnType>().unwrap(), ColumnType::Float);
        assert_eq!("str".parse::<ColumnType>().unwrap(), ColumnType::String);
        assert_eq!("bool".parse::<ColumnType>().unwrap(), ColumnType::Boolean);
        assert!("decimal".parse::<ColumnType>().is_err());
    }

    #[test]
    fn existing_table_policy_defaults_to_replace() {
        assert_eq!(ExistingTablePolicy::default(), ExistingTablePolicy::Replace);
        assert_eq!(
            "APPEND".parse::<ExistingTablePolicy>().unwrap(),
            ExistingTablePolicy::Append
        );
        assert!("upsert".parse::<ExistingTablePolicy>().is_err());
    }

    #[test]
    fn input_format_extensions() {
        assert!(InputFormat::Json.extensions().contains(&"json"));
        assert!(InputFormat::Xml.extensions().contains(&"xml"));
        assert_eq!("XML".parse::<InputFormat>().unwrap(), InputFormat::Xml);
    }
}
