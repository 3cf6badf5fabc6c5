//! Markdown report generation
//!
//! This module turns an audit into the human-readable canonical report,
//! including run information, discovery counts and the pages and canonical
//! targets that need attention.

use crate::canonical::{CanonicalAudit, CanonicalRecord};
use crate::output::stats::CanonicalStats;
use crate::output::traits::{report_file_name, write_report_file, OutputResult, ReportWriter};
use std::path::{Path, PathBuf};

/// Rows listed per section before the rest is summarized
const MAX_LISTED: usize = 100;

/// Writes the audit as `{client}_Canonical_Report_{timestamp}.md`
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReportWriter;

impl ReportWriter for MarkdownReportWriter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write(&self, audit: &CanonicalAudit, dir: &Path) -> OutputResult<PathBuf> {
        let markdown = format_markdown_report(audit);
        let file_name = report_file_name(audit, "Canonical_Report", "md");
        write_report_file(dir, &file_name, &markdown)
    }
}

/// Formats an audit as markdown
///
/// # Arguments
///
/// * `audit` - The finished audit
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(audit: &CanonicalAudit) -> String {
    let stats = CanonicalStats::from_audit(audit);
    let run = &audit.run;
    let mut md = String::new();

    md.push_str(&format!("# Canonical Tag Report: {}\n\n", run.client_name));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Sitemap Index**: {}\n", run.index_url));
    md.push_str(&format!("- **Target Category**: {}\n", run.target_category));
    md.push_str(&format!("- **Sample Cap**: {}\n", run.sample_cap));
    md.push_str(&format!("- **Started**: {}\n", run.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", run.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        (run.finished_at - run.started_at).num_seconds()
    ));
    if !run.config_hash.is_empty() {
        md.push_str(&format!("- **Config Hash**: {}\n", run.config_hash));
    }
    md.push('\n');

    md.push_str("## Discovered URLs\n\n");
    md.push_str("| Category | URLs |\n");
    md.push_str("|----------|------|\n");
    for (category, count) in &stats.discovered {
        md.push_str(&format!("| {} | {} |\n", category, count));
    }
    md.push_str(&format!("| **Total** | {} |\n\n", stats.total_discovered()));

    md.push_str("## Canonical Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages swept | {} |\n", stats.pages_sampled));
    md.push_str(&format!("| Fetch failures | {} |\n", stats.pages_failed));
    md.push_str(&format!(
        "| Missing canonical | {} |\n",
        stats.pages_missing_canonical
    ));
    md.push_str(&format!(
        "| Self-referencing canonical | {} |\n",
        stats.pages_self_canonical
    ));
    md.push_str(&format!(
        "| Canonicalized elsewhere | {} |\n",
        stats.pages_canonicalized_elsewhere
    ));
    md.push_str(&format!("| Unique canonical targets | {} |\n", stats.unique_targets));
    md.push_str(&format!(
        "| Targets resolved from swept pages | {} |\n",
        stats.targets_resolved_locally
    ));
    md.push_str(&format!(
        "| Targets fetched | {} |\n",
        stats.targets_resolved_remotely
    ));
    md.push_str(&format!(
        "| Targets with non-2xx status | {} |\n",
        stats.targets_non_success
    ));
    md.push_str(&format!(
        "| Unreachable targets | {} |\n\n",
        stats.targets_unreachable
    ));
    md.push_str(&format!(
        "Canonical coverage: {:.1}%\n\n",
        stats.canonical_coverage()
    ));

    let records: Vec<&CanonicalRecord> = audit.categorized_urls_and_canonicals.values().collect();

    let failed: Vec<_> = records.iter().filter(|r| r.is_failed()).collect();
    if !failed.is_empty() {
        md.push_str("## Pages That Could Not Be Fetched\n\n");
        push_url_list(&mut md, failed.iter().map(|r| r.url.as_str()), failed.len());
    }

    let missing: Vec<_> = records
        .iter()
        .filter(|r| !r.is_failed() && r.is_missing_canonical())
        .collect();
    if !missing.is_empty() {
        md.push_str("## Pages Missing a Canonical Tag\n\n");
        md.push_str("| URL | Status |\n");
        md.push_str("|-----|--------|\n");
        for record in missing.iter().take(MAX_LISTED) {
            md.push_str(&format!(
                "| {} | {} |\n",
                record.url,
                format_status(record.url_status_code)
            ));
        }
        push_overflow(&mut md, missing.len());
    }

    let elsewhere: Vec<_> = records
        .iter()
        .filter(|r| r.canonical_url.is_some() && !r.is_self_canonical())
        .collect();
    if !elsewhere.is_empty() {
        md.push_str("## Pages Canonicalized Elsewhere\n\n");
        md.push_str("| URL | Canonical |\n");
        md.push_str("|-----|-----------|\n");
        for record in elsewhere.iter().take(MAX_LISTED) {
            md.push_str(&format!(
                "| {} | {} |\n",
                record.url,
                record.canonical_url.as_deref().unwrap_or_default()
            ));
        }
        push_overflow(&mut md, elsewhere.len());
    }

    let broken: Vec<_> = audit
        .canonical_resolutions
        .iter()
        .filter(|r| !r.is_success())
        .collect();
    if !broken.is_empty() {
        md.push_str("## Canonical Targets Needing Attention\n\n");
        md.push_str("| Canonical | Status | Source |\n");
        md.push_str("|-----------|--------|--------|\n");
        for resolution in broken.iter().take(MAX_LISTED) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                resolution.canonical_url,
                format_status(resolution.status_code),
                resolution.source
            ));
        }
        push_overflow(&mut md, broken.len());
    }

    md
}

fn format_status(status: Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "unreachable".to_string(),
    }
}

fn push_url_list<'a>(md: &mut String, urls: impl Iterator<Item = &'a str>, total: usize) {
    for url in urls.take(MAX_LISTED) {
        md.push_str(&format!("- {}\n", url));
    }
    push_overflow(md, total);
}

fn push_overflow(md: &mut String, total: usize) {
    if total > MAX_LISTED {
        md.push_str(&format!("\n... and {} more\n", total - MAX_LISTED));
    }
    md.push('\n');
}
