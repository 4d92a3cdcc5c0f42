//! Reading a scan report from disk.

use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Reads `path` and parses its whole content as a JSON document.
///
/// # Errors
///
/// - [`ReportError::NotFound`] if the path does not exist
/// - [`ReportError::InvalidJson`] if the content is not valid JSON
/// - [`ReportError::Read`] for any other I/O failure
pub fn load_report(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ReportError::NotFound(path.to_path_buf()),
        _ => ReportError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let document = serde_json::from_str(&content).map_err(ReportError::InvalidJson)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded report");
    Ok(document)
}
