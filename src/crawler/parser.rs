//! HTML parser for extracting the canonical link
//!
//! Only the first `<link rel="canonical">` in the document counts. The href
//! is returned verbatim: relative values, trailing slashes and scheme or
//! host variations are all kept as written.

use scraper::{Html, Selector};

/// Finds the href of the first canonical link in an HTML document
///
/// # Matching Rules
///
/// - Any `<link>` whose `rel` attribute contains the token `canonical`
///   (case-insensitive, whitespace-separated) qualifies.
/// - The href is trimmed of surrounding whitespace and otherwise untouched.
/// - A canonical link with a missing or blank href yields `None`; later
///   canonical links are not consulted.
///
/// # Example
///
/// ```
/// use canon_sweep::crawler::find_canonical_href;
///
/// let html = r#"<html><head><link rel="canonical" href="/shoes"></head></html>"#;
/// assert_eq!(find_canonical_href(html), Some("/shoes".to_string()));
/// ```
pub fn find_canonical_href(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("link[rel]").ok()?;

    let canonical = document.select(&selector).find(|element| {
        element
            .value()
            .attr("rel")
            .map(has_canonical_token)
            .unwrap_or(false)
    })?;

    canonical
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

fn has_canonical_token(rel: &str) -> bool {
    rel.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("canonical"))
}
