use super::source::read_source;
use crate::errors::{AppError, AppResult};
use crate::models::ParseMode;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info};

/// Parses JSON text held in memory.
pub fn parse_json_str(content: &str) -> AppResult<Value> {
    serde_json::from_str(content.trim_start_matches('\u{feff}').trim()).map_err(|e| {
        AppError::MalformedInput {
            path: "<string>".to_string(),
            reason: e.to_string(),
        }
    })
}

/// Loads a JSON document from disk.
///
/// The top level may be an object or an array. Every failure is logged at error
/// level with the offending path before it is returned.
///
/// # Errors
///
/// `NotFound`, `EmptyInput` or `MalformedInput` depending on what went wrong.
pub fn load_json_file(path: impl AsRef<Path>) -> AppResult<Value> {
    let path = path.as_ref();
    let content = read_source(path, "JSON")?;

    let value = serde_json::from_str(&content).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to parse JSON file");
        AppError::MalformedInput {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    debug!(path = %path.display(), "Loaded JSON file");
    Ok(value)
}

/// Safe variant of [`load_json_file`]: failures are logged and yield `None`.
pub fn load_json_file_safe(path: impl AsRef<Path>) -> Option<Value> {
    load_json_file(path).ok()
}

/// Loads every path in order.
///
/// In [`ParseMode::Safe`] files that fail are skipped and only the successful
/// documents are returned. In [`ParseMode::Strict`] the first failure is returned.
pub fn load_multiple_json<P: AsRef<Path>>(paths: &[P], mode: ParseMode) -> AppResult<Vec<Value>> {
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        match mode {
            ParseMode::Strict => documents.push(load_json_file(path)?),
            ParseMode::Safe => {
                if let Some(value) = load_json_file_safe(path) {
                    documents.push(value);
                }
            }
        }
    }

    info!(
        requested = paths.len(),
        loaded = documents.len(),
        "Loaded JSON files"
    );
    Ok(documents)
}
