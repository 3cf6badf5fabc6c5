use crate::sitemap::Category;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Canon-Sweep
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sitemap: SitemapConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Sitemap index source
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapConfig {
    /// URL of the sitemap index document
    #[serde(rename = "index-url")]
    pub index_url: String,

    /// Per-request timeout for the index and child sitemaps (seconds)
    #[serde(rename = "timeout-secs", default = "default_sitemap_timeout")]
    pub timeout_secs: u64,
}

fn default_sitemap_timeout() -> u64 {
    10
}

impl SitemapConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Canonical sweep behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Category whose pages are sampled for canonical tags
    #[serde(rename = "target-category")]
    pub target_category: Category,

    /// Maximum number of pages fetched from the target category
    #[serde(rename = "sample-cap")]
    pub sample_cap: usize,

    /// Per-request timeout for page and canonical-target fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Pause between consecutive page fetches (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Deadline for the whole run; unset means no deadline (seconds)
    #[serde(rename = "run-deadline-secs")]
    pub run_deadline_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            target_category: Category::Products,
            sample_cap: 2000,
            request_timeout_secs: 15,
            request_delay_ms: 0,
            run_deadline_secs: None,
        }
    }
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value sent with every request
    pub header: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Client name used in report titles and file names
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Directory receiving the JSON artifact and markdown report
    #[serde(rename = "report-dir")]
    pub report_dir: String,
}
