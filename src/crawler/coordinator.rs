//! Pipeline coordinator - end-to-end run orchestration
//!
//! This module drives one audit run:
//! - Fetching and parsing the sitemap index (the only fatal network step)
//! - Collecting categorized page URLs from every child sitemap
//! - Running the canonical resolution engine on the target category
//! - Assembling the audit artifact with run metadata
//! - Enforcing the optional run-level deadline

use crate::canonical::{resolve_category, CanonicalAudit, RunInfo, SweepOptions};
use crate::config::Config;
use crate::crawler::{build_http_client, fetch_sitemap_document};
use crate::sitemap::{collect_categorized_urls, parse_locations, CategorizedUrls};
use crate::{AuditError, SitemapError};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

/// Main pipeline coordinator
pub struct Coordinator {
    config: Config,
    client: Client,
    config_hash: String,
}

impl Coordinator {
    /// Creates a coordinator and the HTTP client shared by every stage
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(AuditError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, AuditError> {
        let client = build_http_client(&config.user_agent)?;

        Ok(Self {
            config,
            client,
            config_hash: String::new(),
        })
    }

    /// Attaches the configuration hash stamped into the audit's run metadata
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the complete pipeline
    ///
    /// 1. Fetch and parse the sitemap index
    /// 2. Categorize and collect page URLs from each child sitemap
    /// 3. Sweep the target category for canonical tags
    /// 4. Deduplicate canonical targets and resolve their status
    ///
    /// When `run-deadline-secs` is configured the whole run is bounded by it.
    /// Expiry aborts the run with `AuditError::DeadlineExceeded` and any
    /// records collected so far are discarded.
    pub async fn run(&self) -> Result<CanonicalAudit, AuditError> {
        match self.config.crawler.run_deadline_secs {
            Some(seconds) => {
                tokio::time::timeout(Duration::from_secs(seconds), self.run_pipeline())
                    .await
                    .map_err(|_| {
                        tracing::error!("Run deadline of {}s expired, discarding partial results", seconds);
                        AuditError::DeadlineExceeded { seconds }
                    })?
            }
            None => self.run_pipeline().await,
        }
    }

    /// Runs only the discovery stages: sitemap index and child sitemaps
    pub async fn discover(&self) -> Result<CategorizedUrls, AuditError> {
        let sitemap_urls = self.fetch_sitemap_index().await?;
        Ok(collect_categorized_urls(&self.client, &sitemap_urls, self.config.sitemap.timeout()).await)
    }

    async fn run_pipeline(&self) -> Result<CanonicalAudit, AuditError> {
        let started_at = Utc::now();
        tracing::info!(
            client = %self.config.output.client_name,
            index = %self.config.sitemap.index_url,
            "Starting canonical audit"
        );

        let urls = self.discover().await?;

        let options = SweepOptions::from_config(&self.config.crawler);
        let outcome = resolve_category(&self.client, &urls, &options).await;

        let finished_at = Utc::now();
        tracing::info!(
            "Audit completed in {}s: {} records, {} canonical targets",
            (finished_at - started_at).num_seconds(),
            outcome.records.len(),
            outcome.canonical_tags.len()
        );

        Ok(CanonicalAudit {
            run: RunInfo {
                client_name: self.config.output.client_name.clone(),
                index_url: self.config.sitemap.index_url.clone(),
                target_category: options.target,
                sample_cap: options.sample_cap,
                config_hash: self.config_hash.clone(),
                started_at,
                finished_at,
                discovered: urls.counts(),
            },
            categorized_urls_and_canonicals: outcome.records,
            canonical_tags: outcome.canonical_tags,
            canonical_resolutions: outcome.resolutions,
        })
    }

    /// Fetches and parses the sitemap index; both failures are fatal
    async fn fetch_sitemap_index(&self) -> Result<Vec<String>, AuditError> {
        let index_url = &self.config.sitemap.index_url;

        let body = fetch_sitemap_document(&self.client, index_url, self.config.sitemap.timeout())
            .await
            .map_err(|e| AuditError::IndexFetch {
                url: index_url.clone(),
                message: e.to_string(),
            })?;

        let sitemap_urls = parse_locations(&body).map_err(|source: SitemapError| {
            AuditError::IndexParse {
                url: index_url.clone(),
                source,
            }
        })?;

        tracing::info!("Sitemap index lists {} sitemaps", sitemap_urls.len());
        Ok(sitemap_urls)
    }
}

/// Runs one audit with the given configuration
///
/// # Example
///
/// ```no_run
/// use canon_sweep::config::load_config;
/// use canon_sweep::crawler::run_audit;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let audit = run_audit(config).await?;
/// println!("{} canonical targets", audit.canonical_tags.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(config: Config) -> Result<CanonicalAudit, AuditError> {
    Coordinator::new(config)?.run().await
}
