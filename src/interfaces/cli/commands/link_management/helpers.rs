//! Shared helpers for link commands

use std::path::Path;

use crate::interfaces::cli::CliError;

/// Absolute form of a path given on the command line.
///
/// The path does not need to exist; symlinks are not resolved.
pub fn absolutize(path: &str) -> Result<String, CliError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(CliError::ParseError("Empty path".to_string()));
    }
    std::path::absolute(Path::new(trimmed))
        .map(|p| p.to_string_lossy().into_owned())
        .map_err(|e| CliError::ParseError(format!("Invalid path '{}': {}", trimmed, e)))
}
