//! Loading JSON and XML input files into in-memory trees.
//!
//! Every loader reads the file as UTF-8 (dropping a byte-order mark), strips
//! surrounding whitespace and reports missing, empty and malformed input as
//! distinct [`AppError`](crate::errors::AppError) variants. Safe variants log the
//! failure and return `None` instead.

pub mod file_finder;
pub mod json_parser;
mod source;
pub mod xml_parser;

pub use file_finder::find_input_files;
pub use json_parser::{load_json_file, load_json_file_safe, load_multiple_json, parse_json_str};
pub use xml_parser::{
    load_multiple_xml, load_xml_file, load_xml_file_safe, parse_xml_str, XmlElement,
};
