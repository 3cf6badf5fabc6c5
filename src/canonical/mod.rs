//! Canonical tag collection and resolution
//!
//! This module contains the core of the audit:
//! - Per-page canonical extraction with failure isolation
//! - The sweep over a bounded sample of one category
//! - Deduplication of canonical targets and their status resolution
//! - The audit artifact handed to report writers

mod extractor;
mod resolution;
mod types;

pub use extractor::extract_canonical;
pub use resolution::{
    find_record, resolve_canonicals, resolve_category, sweep_category, unique_canonicals,
    ResolutionOutcome, SweepOptions,
};
pub use types::{
    CanonicalAudit, CanonicalRecord, CanonicalResolution, CanonicalTag, CategorizedRecords,
    ResolutionSource, RunInfo,
};
