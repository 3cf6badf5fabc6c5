//! Categorized URL collection across child sitemaps

use crate::crawler::fetch_sitemap_document;
use crate::sitemap::{categorize, parse_locations, CategoryMap};
use crate::SitemapResult;
use reqwest::Client;
use std::time::Duration;

/// Page URLs grouped by the category of the sitemap they came from
pub type CategorizedUrls = CategoryMap<String>;

/// Fetches and parses every child sitemap, bucketing page URLs by category
///
/// Sitemaps are processed one at a time in the order given. The category is
/// decided from the *sitemap* URL, so every page in one sitemap shares it.
///
/// A child sitemap that fails to fetch or parse is logged and contributes
/// nothing; the remaining sitemaps are still processed.
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `sitemap_urls` - Child sitemap URLs in index order
/// * `timeout` - Per-request timeout
pub async fn collect_categorized_urls(
    client: &Client,
    sitemap_urls: &[String],
    timeout: Duration,
) -> CategorizedUrls {
    let mut categorized = CategorizedUrls::new();

    for (index, sitemap_url) in sitemap_urls.iter().enumerate() {
        let category = categorize(sitemap_url);
        tracing::debug!(
            sitemap = %sitemap_url,
            %category,
            "Processing sitemap {}/{}",
            index + 1,
            sitemap_urls.len()
        );

        match fetch_child_sitemap(client, sitemap_url, timeout).await {
            Ok(page_urls) => {
                tracing::info!(
                    sitemap = %sitemap_url,
                    %category,
                    "Found {} page URLs",
                    page_urls.len()
                );
                categorized.extend(category, page_urls);
            }
            Err(e) => {
                tracing::warn!(sitemap = %sitemap_url, error = %e, "Skipping sitemap");
            }
        }
    }

    tracing::info!(
        "Collected {} page URLs from {} sitemaps",
        categorized.len(),
        sitemap_urls.len()
    );

    categorized
}

async fn fetch_child_sitemap(
    client: &Client,
    sitemap_url: &str,
    timeout: Duration,
) -> SitemapResult<Vec<String>> {
    let body = fetch_sitemap_document(client, sitemap_url, timeout).await?;
    parse_locations(&body)
}
