use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;
use tracing::error;

/// Reads a text input file for parsing.
///
/// The file must exist as a regular file, decode as UTF-8 (a leading byte-order
/// mark is dropped) and contain something other than whitespace. The returned
/// text has surrounding whitespace stripped.
///
/// # Errors
///
/// - `NotFound` if `path` is not a regular file
/// - `MalformedInput` if the bytes are not valid UTF-8
/// - `EmptyInput` if nothing but whitespace remains
/// - `Io` for any other read failure
pub(crate) fn read_source(path: &Path, kind: &str) -> AppResult<String> {
    if !path.is_file() {
        let msg = format!("{kind} file not found: {}", path.display());
        error!(path = %path.display(), "{msg}");
        return Err(AppError::NotFound(path.display().to_string()));
    }

    let bytes = fs::read(path).map_err(|e| {
        error!(path = %path.display(), error = %e, "Failed to read {kind} file");
        AppError::Io(e)
    })?;

    let text = String::from_utf8(bytes).map_err(|e| {
        error!(path = %path.display(), error = %e, "{kind} file is not valid UTF-8");
        AppError::MalformedInput {
            path: path.display().to_string(),
            reason: format!("invalid UTF-8: {e}"),
        }
    })?;

    let content = text.strip_prefix('\u{feff}').unwrap_or(&text).trim();
    if content.is_empty() {
        error!(
            path = %path.display(),
            "{kind} file is empty or contains only whitespace"
        );
        return Err(AppError::EmptyInput(path.display().to_string()));
    }

    Ok(content.to_string())
}
