use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Recursively collects files under `dir` whose extension matches one of
/// `extensions` (case-insensitive).
///
/// Results are sorted so batch loads are deterministic.
///
/// # Errors
///
/// Returns `NotFound` if `dir` is not a directory.
pub fn find_input_files(dir: &Path, extensions: &[&str]) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(dir.display().to_string()));
    }

    // Pre-allocate with conservative estimate (usually 1-20 input files per directory)
    let mut v = Vec::with_capacity(20);
    let walker = walkdir::WalkDir::new(dir).into_iter();
    for entry in walker.flatten() {
        if entry.file_type().is_file() {
            if let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) {
                if extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)) {
                    v.push(entry.path().to_path_buf());
                }
            }
        }
    }
    v.sort();
    Ok(v)
}
