//! Canonical resolution engine
//!
//! Sweeps a bounded sample of one category, then resolves the status of
//! every distinct canonical target. A target that was itself part of the
//! sweep reuses the status already recorded for it; only targets outside
//! the sweep are fetched, each exactly once.

use crate::canonical::{
    extract_canonical, CanonicalRecord, CanonicalResolution, CategorizedRecords, ResolutionSource,
};
use crate::config::CrawlerConfig;
use crate::crawler::{fetch_status, RequestPacer};
use crate::sitemap::{CategorizedUrls, Category};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

/// Parameters for one canonical sweep
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Category whose page URLs are sampled
    pub target: Category,

    /// Maximum number of pages fetched from the target category
    pub sample_cap: usize,

    /// Per-request timeout for pages and canonical targets
    pub request_timeout: Duration,

    /// Minimum interval between consecutive requests
    pub request_delay: Duration,
}

impl SweepOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            target: config.target_category,
            sample_cap: config.sample_cap,
            request_timeout: config.request_timeout(),
            request_delay: config.request_delay(),
        }
    }
}

/// Records, distinct canonical targets and their resolutions for one sweep
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub records: CategorizedRecords,
    pub canonical_tags: Vec<String>,
    pub resolutions: Vec<CanonicalResolution>,
}

/// Runs the full engine: sweep, deduplicate, resolve
pub async fn resolve_category(
    client: &Client,
    urls: &CategorizedUrls,
    options: &SweepOptions,
) -> ResolutionOutcome {
    let mut pacer = RequestPacer::new(options.request_delay);

    let records = sweep_category(client, urls, options, &mut pacer).await;
    let canonical_tags = unique_canonicals(&records);
    let resolutions =
        resolve_canonicals(client, &records, &canonical_tags, options, &mut pacer).await;

    ResolutionOutcome {
        records,
        canonical_tags,
        resolutions,
    }
}

/// Extracts the canonical tag of up to `sample_cap` pages of the target category
///
/// Every category is present in the result; only the target bucket is
/// populated. Pages that fail are recorded with null fields.
pub async fn sweep_category(
    client: &Client,
    urls: &CategorizedUrls,
    options: &SweepOptions,
    pacer: &mut RequestPacer,
) -> CategorizedRecords {
    let mut records = CategorizedRecords::new();
    let candidates = urls.get(options.target);
    let sample = &candidates[..candidates.len().min(options.sample_cap)];

    tracing::info!(
        category = %options.target,
        "Sweeping {} of {} pages for canonical tags",
        sample.len(),
        candidates.len()
    );

    for (index, url) in sample.iter().enumerate() {
        pacer.wait_turn().await;

        let tag = extract_canonical(client, url, options.request_timeout).await;
        let record = CanonicalRecord::from_extraction(url.as_str(), tag);
        tracing::debug!(
            %url,
            status = ?record.url_status_code,
            canonical = ?record.canonical_url,
            "Recorded canonical"
        );
        records.push(options.target, record);

        if (index + 1) % 50 == 0 {
            tracing::info!("Progress: {}/{} pages swept", index + 1, sample.len());
        }
    }

    records
}

/// Collects distinct non-null canonical URLs in first-seen order
///
/// Deduplication is by exact string equality; no URL normalization is
/// applied.
pub fn unique_canonicals(records: &CategorizedRecords) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .values()
        .filter_map(|record| record.canonical_url.as_deref())
        .filter(|canonical| seen.insert(*canonical))
        .map(str::to_string)
        .collect()
}

/// Finds the record whose page URL is exactly `target`, across all categories
pub fn find_record<'a>(records: &'a CategorizedRecords, target: &str) -> Option<&'a CanonicalRecord> {
    records.values().find(|record| record.url == target)
}

/// Resolves every canonical target exactly once
///
/// Targets matching a swept page take that page's recorded status without a
/// network call. All others are fetched with the shared client; a target
/// that cannot be reached resolves with no status.
pub async fn resolve_canonicals(
    client: &Client,
    records: &CategorizedRecords,
    canonical_tags: &[String],
    options: &SweepOptions,
    pacer: &mut RequestPacer,
) -> Vec<CanonicalResolution> {
    let mut resolutions = Vec::with_capacity(canonical_tags.len());
    let mut remote_fetches = 0usize;

    for canonical_url in canonical_tags {
        let resolution = match find_record(records, canonical_url) {
            Some(record) => CanonicalResolution {
                canonical_url: canonical_url.clone(),
                status_code: record.url_status_code,
                source: ResolutionSource::Local,
            },
            None => {
                pacer.wait_turn().await;
                remote_fetches += 1;

                let status_code =
                    match fetch_status(client, canonical_url, options.request_timeout).await {
                        Ok(status) => Some(status),
                        Err(e) => {
                            tracing::warn!(
                                canonical = %canonical_url,
                                error = %e,
                                "Canonical target unreachable"
                            );
                            None
                        }
                    };

                CanonicalResolution {
                    canonical_url: canonical_url.clone(),
                    status_code,
                    source: ResolutionSource::Remote,
                }
            }
        };

        tracing::debug!(
            canonical = %resolution.canonical_url,
            status = ?resolution.status_code,
            source = ?resolution.source,
            "Resolved canonical"
        );
        resolutions.push(resolution);
    }

    tracing::info!(
        "Resolved {} canonical targets ({} locally, {} fetched)",
        resolutions.len(),
        resolutions.len() - remote_fetches,
        remote_fetches
    );

    resolutions
}
