//! Output module for audit artifacts and reports
//!
//! This module handles:
//! - Persisting the audit as a JSON artifact and reading it back
//! - Generating the markdown canonical report
//! - Computing and printing audit statistics

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{load_audit, JsonArtifactWriter};
pub use markdown::{format_markdown_report, MarkdownReportWriter};
pub use stats::{print_statistics, CanonicalStats};
pub use traits::{report_file_name, sanitize_client_name, OutputError, OutputResult, ReportWriter};

use crate::canonical::CanonicalAudit;
use std::path::{Path, PathBuf};

/// Writes the audit with every given writer into `dir`
///
/// Stops at the first writer that fails.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the written files, in writer order
/// * `Err(OutputError)` - A writer failed
pub fn write_reports(
    audit: &CanonicalAudit,
    dir: &Path,
    writers: &[&dyn ReportWriter],
) -> OutputResult<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(writers.len());
    for writer in writers {
        let path = writer.write(audit, dir)?;
        tracing::info!("Wrote {} report to {}", writer.name(), path.display());
        paths.push(path);
    }
    Ok(paths)
}
