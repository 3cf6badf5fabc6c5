use crate::sitemap::{Category, CategoryMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical data extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTag {
    /// The first canonical link's href, verbatim
    pub href: Option<String>,

    /// HTTP status of the page response
    pub status_code: Option<u16>,
}

/// One sampled page and its declared canonical
///
/// A page that could not be fetched or was not HTML is still recorded, with
/// both nullable fields set to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub url: String,
    pub url_status_code: Option<u16>,
    pub canonical_url: Option<String>,
}

impl CanonicalRecord {
    /// Builds a record from an extraction outcome (`None` means it failed)
    pub fn from_extraction(url: impl Into<String>, tag: Option<CanonicalTag>) -> Self {
        let (url_status_code, canonical_url) = match tag {
            Some(tag) => (tag.status_code, tag.href),
            None => (None, None),
        };

        Self {
            url: url.into(),
            url_status_code,
            canonical_url,
        }
    }

    /// True when the page declares itself as its own canonical
    pub fn is_self_canonical(&self) -> bool {
        self.canonical_url.as_deref() == Some(self.url.as_str())
    }

    /// True when the page was fetched (it has a status) but declares no canonical
    pub fn is_missing_canonical(&self) -> bool {
        self.url_status_code.is_some() && self.canonical_url.is_none()
    }

    /// True when the page could not be fetched or inspected
    pub fn is_failed(&self) -> bool {
        self.url_status_code.is_none() && self.canonical_url.is_none()
    }
}

/// Sampled records grouped by the category of their sitemap
pub type CategorizedRecords = CategoryMap<CanonicalRecord>;

/// How a canonical target's status was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionSource {
    /// The target was itself a sampled page; its recorded status was reused
    Local,
    /// The target was fetched on its own
    Remote,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Resolved status of one distinct canonical target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalResolution {
    pub canonical_url: String,

    /// HTTP status, or `None` when the target could not be reached
    pub status_code: Option<u16>,

    pub source: ResolutionSource,
}

impl CanonicalResolution {
    pub fn is_unreachable(&self) -> bool {
        self.status_code.is_none()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(code) if (200..300).contains(&code))
    }
}

/// Metadata describing the run that produced an audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub client_name: String,
    pub index_url: String,
    pub target_category: Category,
    pub sample_cap: usize,
    pub config_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of page URLs discovered per category
    pub discovered: BTreeMap<Category, usize>,
}

/// Complete output of one pipeline run
///
/// Serialized as the JSON artifact consumed by report collaborators; the
/// `categorized_urls_and_canonicals` and `canonical_tags` keys are the
/// stable contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAudit {
    pub run: RunInfo,
    pub categorized_urls_and_canonicals: CategorizedRecords,

    /// Distinct canonical targets in first-seen order
    pub canonical_tags: Vec<String>,

    pub canonical_resolutions: Vec<CanonicalResolution>,
}
