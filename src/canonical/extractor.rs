//! Canonical tag extraction for a single page

use crate::canonical::CanonicalTag;
use crate::crawler::{fetch_page, find_canonical_href, FetchResult};
use reqwest::Client;
use std::time::Duration;

/// Fetches a page and extracts its canonical href and HTTP status
///
/// Returns `None` when the page could not be inspected at all: network
/// errors, timeouts, unreadable bodies and non-HTML responses. A page that
/// was fetched but declares no canonical yields `Some` with `href: None`.
/// Failures are logged and never propagate, so one bad page cannot stop
/// its siblings from being processed.
pub async fn extract_canonical(client: &Client, url: &str, timeout: Duration) -> Option<CanonicalTag> {
    match fetch_page(client, url, timeout).await {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            if final_url != url {
                tracing::debug!(%url, %final_url, "Page redirected");
            }

            let href = find_canonical_href(&body);
            if href.is_none() {
                tracing::debug!(%url, status = status_code, "No canonical tag");
            }

            Some(CanonicalTag {
                href,
                status_code: Some(status_code),
            })
        }
        FetchResult::ContentMismatch {
            status_code,
            content_type,
        } => {
            tracing::warn!(
                %url,
                status = status_code,
                %content_type,
                "Skipping non-HTML response"
            );
            None
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!(%url, %error, "Failed to fetch page");
            None
        }
    }
}
