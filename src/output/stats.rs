//! Statistics derived from a canonical audit
//!
//! This module summarizes an audit into the counts shown on the command
//! line and at the top of the markdown report.

use crate::canonical::{CanonicalAudit, ResolutionSource};
use crate::sitemap::Category;
use std::collections::BTreeMap;

/// Canonical audit statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalStats {
    /// Page URLs discovered per category
    pub discovered: BTreeMap<Category, usize>,

    /// Pages of the target category that were swept
    pub pages_sampled: usize,

    /// Sampled pages that could not be fetched or were not HTML
    pub pages_failed: usize,

    /// Fetched pages without a canonical tag
    pub pages_missing_canonical: usize,

    /// Pages whose canonical is their own URL
    pub pages_self_canonical: usize,

    /// Pages whose canonical points somewhere else
    pub pages_canonicalized_elsewhere: usize,

    /// Distinct canonical targets
    pub unique_targets: usize,

    /// Targets whose status came from a swept page
    pub targets_resolved_locally: usize,

    /// Targets that needed their own fetch
    pub targets_resolved_remotely: usize,

    /// Targets that answered with a non-2xx status
    pub targets_non_success: usize,

    /// Targets with no status at all
    pub targets_unreachable: usize,
}

impl CanonicalStats {
    /// Computes statistics for an audit
    pub fn from_audit(audit: &CanonicalAudit) -> Self {
        let mut stats = Self {
            discovered: audit.run.discovered.clone(),
            unique_targets: audit.canonical_tags.len(),
            ..Self::default()
        };

        for record in audit.categorized_urls_and_canonicals.values() {
            stats.pages_sampled += 1;
            if record.is_failed() {
                stats.pages_failed += 1;
            } else if record.is_missing_canonical() {
                stats.pages_missing_canonical += 1;
            } else if record.is_self_canonical() {
                stats.pages_self_canonical += 1;
            } else {
                stats.pages_canonicalized_elsewhere += 1;
            }
        }

        for resolution in &audit.canonical_resolutions {
            match resolution.source {
                ResolutionSource::Local => stats.targets_resolved_locally += 1,
                ResolutionSource::Remote => stats.targets_resolved_remotely += 1,
            }
            if resolution.is_unreachable() {
                stats.targets_unreachable += 1;
            } else if !resolution.is_success() {
                stats.targets_non_success += 1;
            }
        }

        stats
    }

    /// Total page URLs discovered across all categories
    pub fn total_discovered(&self) -> usize {
        self.discovered.values().sum()
    }

    /// Share of sampled pages that declare a canonical, as a percentage
    pub fn canonical_coverage(&self) -> f64 {
        let fetched = self.pages_sampled - self.pages_failed;
        if fetched == 0 {
            return 0.0;
        }
        let with_canonical = fetched - self.pages_missing_canonical;
        (with_canonical as f64 / fetched as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CanonicalStats) {
    println!("=== Canonical Audit Statistics ===\n");

    println!("Discovered Pages ({} total):", stats.total_discovered());
    for (category, count) in &stats.discovered {
        println!("  {}: {}", category, count);
    }
    println!();

    println!("Sampled Pages:");
    println!("  Swept: {}", stats.pages_sampled);
    println!("  Fetch failures: {}", stats.pages_failed);
    println!("  Missing canonical: {}", stats.pages_missing_canonical);
    println!("  Self-referencing canonical: {}", stats.pages_self_canonical);
    println!(
        "  Canonicalized elsewhere: {}",
        stats.pages_canonicalized_elsewhere
    );
    println!();

    println!("Canonical Targets ({} unique):", stats.unique_targets);
    println!("  Resolved from swept pages: {}", stats.targets_resolved_locally);
    println!("  Fetched: {}", stats.targets_resolved_remotely);
    println!("  Non-2xx status: {}", stats.targets_non_success);
    println!("  Unreachable: {}", stats.targets_unreachable);
    println!();

    println!("Canonical Coverage: {:.1}%", stats.canonical_coverage());
}
