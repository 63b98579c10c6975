// Logging defaults
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE: &str = "transformer.log";
pub const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const LOG_BACKUP_COUNT: usize = 5;
pub const FILE_LOG_LEVEL: &str = "info";
pub const CONSOLE_LOG_LEVEL: &str = "debug";

// Parsing
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const JSON_EXTENSIONS: &[&str] = &["json"];
pub const XML_EXTENSIONS: &[&str] = &["xml"];

// Flattening
pub const KEY_SEPARATOR: &str = ".";

// Export
pub const INDEX_COLUMN: &str = "index";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

// Column type aliases
pub const INTEGER_ALIASES: &[&str] = &["integer", "int", "i64"];
pub const FLOAT_ALIASES: &[&str] = &["float", "f64", "double"];
pub const STRING_ALIASES: &[&str] = &["string", "str", "text"];
pub const BOOLEAN_ALIASES: &[&str] = &["boolean", "bool"];
