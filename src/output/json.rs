//! JSON audit artifact
//!
//! The artifact is the hand-off point to report collaborators. It keeps the
//! `categorized_urls_and_canonicals` and `canonical_tags` top-level keys and
//! can be read back with `load_audit` to regenerate reports later.

use crate::canonical::CanonicalAudit;
use crate::output::traits::{report_file_name, write_report_file, OutputResult, ReportWriter};
use std::path::{Path, PathBuf};

/// Writes the audit as pretty-printed JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonArtifactWriter;

impl ReportWriter for JsonArtifactWriter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, audit: &CanonicalAudit, dir: &Path) -> OutputResult<PathBuf> {
        let json = serde_json::to_string_pretty(audit)?;
        let file_name = report_file_name(audit, "canonical_audit", "json");
        write_report_file(dir, &file_name, &json)
    }
}

/// Reads a previously written audit artifact
pub fn load_audit(path: &Path) -> OutputResult<CanonicalAudit> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
