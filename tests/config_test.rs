//! Tests for config module

use std::fs;
use std::path::PathBuf;
use tabular_etl::config::{JobConfig, LogConfig, OutputConfig};
use tabular_etl::errors::AppError;
use tabular_etl::models::{ColumnType, ExistingTablePolicy, InputFormat, ParseMode};
use tempfile::TempDir;

#[test]
fn test_job_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("job.toml");

    let config_content = r#"
[input]
format = "json"
paths = ["data/a.json", "data/b.json"]
dir = "data/more"
safe = false

[transform]
rename = { "Details.Age" = "Age" }
functions = { Name = "trim" }

[validate]
required = ["Name"]
types = { Age = "integer", Score = "float", Active = "bool" }

[output]
kind = "excel"
path = "out/people.xlsx"
index = true

[logging]
console_level = "warn"
"#;

    fs::write(&config_path, config_content).unwrap();

    let config = JobConfig::from_toml_file(&config_path).unwrap();

    assert_eq!(config.input.format, InputFormat::Json);
    assert_eq!(config.input.paths.len(), 2);
    assert_eq!(config.input.dir, Some(PathBuf::from("data/more")));
    assert_eq!(config.input.mode(), ParseMode::Strict);
    assert_eq!(config.transform.functions["Name"], "trim");
    assert_eq!(config.validate.required, vec!["Name"]);
    assert_eq!(config.validate.types["Age"], ColumnType::Integer);
    assert_eq!(config.validate.types["Score"], ColumnType::Float);
    assert_eq!(config.validate.types["Active"], ColumnType::Boolean);
    assert_eq!(
        config.output,
        OutputConfig::Excel {
            path: PathBuf::from("out/people.xlsx"),
            index: true
        }
    );
    assert_eq!(config.logging.console_level, "warn");
    assert_eq!(config.logging.file_level, "info");
}

#[test]
fn test_sql_output_defaults_to_replace() {
    let config = JobConfig::from_toml_str(
        r#"
[input]
format = "xml"
dir = "feeds"
record_tag = "Item"

[output]
kind = "sql"
database = "etl.db"
table = "items"
"#,
    )
    .unwrap();

    assert!(matches!(
        config.output,
        OutputConfig::Sql {
            if_exists: ExistingTablePolicy::Replace,
            ..
        }
    ));
}

#[test]
fn test_invalid_configs_are_rejected() {
    let cases = [
        // unknown output kind
        r#"
[input]
format = "json"
paths = ["a.json"]
[output]
kind = "yaml"
path = "out.yaml"
"#,
        // unknown table policy
        r#"
[input]
format = "json"
paths = ["a.json"]
[output]
kind = "sql"
database = "etl.db"
table = "t"
if_exists = "merge"
"#,
        // bad log level
        r#"
[input]
format = "json"
paths = ["a.json"]
[output]
kind = "csv"
path = "out.csv"
[logging]
file_level = "tabular_etl=loud"
"#,
        // missing output
        r#"
[input]
format = "json"
paths = ["a.json"]
"#,
    ];

    for case in cases {
        assert!(
            matches!(JobConfig::from_toml_str(case), Err(AppError::InvalidConfig(_))),
            "accepted invalid config: {case}"
        );
    }
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = JobConfig::from_toml_file(&temp_dir.path().join("missing.toml"));
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.dir, PathBuf::from("logs"));
    assert_eq!(config.file, "transformer.log");
    assert_eq!(config.backup_count, 5);
}
