//! Canon-Sweep: sitemap discovery and canonical-tag consistency auditing
//!
//! This crate walks a sitemap index, buckets every discovered page URL by the
//! category of the sitemap it came from, samples one category to collect each
//! page's `<link rel="canonical">`, and resolves the status of every distinct
//! canonical target.

pub mod canonical;
pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;

use thiserror::Error;

/// Main error type for run-level failures
///
/// Per-page and per-sitemap failures never surface here; they are logged and
/// recorded in the audit instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch sitemap index {url}: {message}")]
    IndexFetch { url: String, message: String },

    #[error("Failed to parse sitemap index {url}: {source}")]
    IndexParse { url: String, source: SitemapError },

    #[error("Run exceeded its deadline of {seconds}s")]
    DeadlineExceeded { seconds: u64 },

    #[error("Run interrupted")]
    Interrupted,

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Sitemap fetch and parse errors
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Request to {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed sitemap XML: {0}")]
    Parse(String),
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for sitemap operations
pub type SitemapResult<T> = std::result::Result<T, SitemapError>;

// Re-export commonly used types
pub use canonical::{CanonicalAudit, CanonicalRecord, CanonicalResolution, ResolutionSource};
pub use config::Config;
pub use crawler::Coordinator;
pub use sitemap::{categorize, Category, CategoryMap};
