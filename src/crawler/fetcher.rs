//! HTTP fetcher implementation
//!
//! Every request the pipeline makes goes through this module, so the
//! sitemap, page and canonical-target fetches all share one client, one
//! `User-Agent` and the same failure classification:
//! - Building the HTTP client from the user agent configuration
//! - GET requests for sitemap documents (non-2xx is an error)
//! - GET requests for pages (any status is kept, non-HTML is flagged)
//! - Status-only GET requests for canonical targets

use crate::config::UserAgentConfig;
use crate::{SitemapError, SitemapResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum number of redirects followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Result of a page fetch
#[derive(Debug)]
pub enum FetchResult {
    /// Received an HTML (or untyped) response
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Response Content-Type is present and not HTML
    ContentMismatch {
        /// HTTP status code
        status_code: u16,
        /// The actual Content-Type received
        content_type: String,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client shared by every stage of the pipeline
///
/// # Example
///
/// ```no_run
/// use canon_sweep::config::UserAgentConfig;
/// use canon_sweep::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     header: "Mozilla/5.0 (compatible; CanonSweep/1.0)".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header.as_str())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a sitemap document and returns its raw bytes
///
/// Any transport failure or non-2xx status is an error; the caller decides
/// whether that is fatal (index) or skippable (child sitemap).
pub async fn fetch_sitemap_document(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> SitemapResult<Vec<u8>> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| SitemapError::Fetch {
            url: url.to_string(),
            message: describe_error(&e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SitemapError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| SitemapError::Fetch {
        url: url.to_string(),
        message: describe_error(&e),
    })?;

    Ok(bytes.to_vec())
}

/// Fetches a page for HTML inspection
///
/// Non-2xx responses are not errors here: the status is reported alongside
/// the body so a 404 page still yields its status code.
pub async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> FetchResult {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                error: describe_error(&e),
            }
        }
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = content_type {
        if !is_html_content_type(&content_type) {
            return FetchResult::ContentMismatch {
                status_code,
                content_type,
            };
        }
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: describe_error(&e),
        },
    }
}

/// Fetches a URL only to learn its HTTP status; the body is never read
pub async fn fetch_status(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<u16, reqwest::Error> {
    let response = client.get(url).timeout(timeout).send().await?;
    Ok(response.status().as_u16())
}

/// Returns true for Content-Type values that carry HTML
fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text/html") || lower.contains("application/xhtml+xml")
}

/// Classifies a reqwest error into a short description for logs and reports
fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    }
}
