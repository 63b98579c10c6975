//! Turning parsed trees into tables and reshaping their columns.

pub mod builtins;
pub mod columns;
pub mod flatten;
pub mod xml_table;

pub use builtins::builtin;
pub use columns::{apply_transforms, rename_columns, ColumnFn, Transforms};
pub use flatten::{
    flatten, json_file_records, json_file_to_table, json_to_table, json_value_to_records,
    records_to_table,
};
pub use xml_table::{xml_file_to_table, xml_records, xml_to_table};
