//! tabular-etl library
//!
//! This crate provides the core functionality for the `tabular-etl` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library turns semi-structured JSON and XML files into flat tables,
//! cleans them and writes them to tabular sinks:
//!
//! - [`parser`] - Loads JSON and XML files (strict, safe and batch variants)
//! - [`transform`] - Flattens nested records into tables, renames columns and applies per-column functions
//! - [`validator`] - Drops rows missing every required field and coerces column types
//! - [`exporter`] - Writes tables to CSV, Excel, Parquet and SQLite
//! - [`pipeline`] - Runs a configured job end to end
//! - [`config`] - TOML job configuration
//! - [`logging`] - Rotating log file plus console output
//! - [`cli`] - Command-line interface
//! - [`table`] - Conversions between tables and JSON cell values
//! - [`models`] - Shared record and option types
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::collections::HashMap;
//! use tabular_etl::errors::AppResult;
//! use tabular_etl::exporter::{export_to_csv, ExportOptions};
//! use tabular_etl::models::ColumnType;
//! use tabular_etl::transform::{json_file_to_table, rename_columns};
//! use tabular_etl::validator::{coerce_types, require_fields};
//!
//! # fn example() -> AppResult<()> {
//! let df = json_file_to_table("people.json")?;
//! let df = rename_columns(df, &HashMap::from([("Details.Age", "Age")]))?;
//! let df = require_fields(df, &["Name", "Age"])?;
//! let df = coerce_types(df, [("Age", ColumnType::Integer)])?;
//! export_to_csv(&df, "out/people.csv", &ExportOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod exporter;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod table;
pub mod transform;
pub mod utils;
pub mod validator;
