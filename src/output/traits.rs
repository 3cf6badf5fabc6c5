//! Report writer trait and shared output helpers
//!
//! Report collaborators consume a finished `CanonicalAudit` through the
//! `ReportWriter` trait; each implementation decides the format and the file
//! name inside the report directory.

use crate::canonical::CanonicalAudit;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize audit: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Something that turns an audit into a file
pub trait ReportWriter {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Writes the audit into `dir`, creating the directory if needed
    ///
    /// # Returns
    ///
    /// The path of the written file
    fn write(&self, audit: &CanonicalAudit, dir: &Path) -> OutputResult<PathBuf>;
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`
///
/// # Examples
///
/// ```
/// use canon_sweep::output::sanitize_client_name;
///
/// assert_eq!(sanitize_client_name("Acme Eye/Care"), "Acme_Eye_Care");
/// ```
pub fn sanitize_client_name(client_name: &str) -> String {
    client_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Builds `{client}_{label}_{YYYYmmdd_HHMMSS}.{extension}` for an audit
///
/// The timestamp is the audit's finish time, so rewriting the same audit
/// always targets the same file.
pub fn report_file_name(audit: &CanonicalAudit, label: &str, extension: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        sanitize_client_name(&audit.run.client_name),
        label,
        audit.run.finished_at.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Writes `content` to `dir/file_name`, creating `dir` first
pub(crate) fn write_report_file(dir: &Path, file_name: &str, content: &str) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, content)?;
    Ok(path)
}
