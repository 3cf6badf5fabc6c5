//! Sitemap XML parser
//!
//! Sitemap indexes and URL sets share the same shape for our purposes: a root
//! element wrapping repeated entries that each carry a `<loc>`. The parser
//! streams the document and collects every `loc` element's text, whatever
//! namespace it is bound to.

use crate::{SitemapError, SitemapResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Extracts every `<loc>` value from a sitemap document, in document order
///
/// - `loc` is matched on its local name, so `<loc>`, `<sm:loc>` and a
///   default-namespaced `<loc>` are all picked up (image sitemap
///   `<image:loc>` entries included).
/// - Values are trimmed; empty or whitespace-only `<loc>` elements are
///   skipped.
/// - Entities are unescaped and CDATA sections are accepted.
///
/// # Errors
///
/// Returns `SitemapError::Parse` when the document is not well-formed XML
/// (mismatched or unclosed tags, bad entities) or contains no root element.
///
/// # Example
///
/// ```
/// use canon_sweep::sitemap::parse_locations;
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///     <url><loc> https://example.com/a </loc></url>
///     <url><loc>https://example.com/b</loc></url>
/// </urlset>"#;
/// let locs = parse_locations(xml.as_bytes()).unwrap();
/// assert_eq!(locs, vec!["https://example.com/a", "https://example.com/b"]);
/// ```
pub fn parse_locations(xml: &[u8]) -> SitemapResult<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut locations = Vec::new();
    let mut depth: usize = 0;
    let mut saw_root = false;
    // Text collected for the `<loc>` currently open, if any
    let mut current: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                saw_root = true;
                if e.local_name().as_ref() == b"loc" {
                    current = Some(String::new());
                }
            }
            Ok(Event::Empty(_)) => {
                saw_root = true;
            }
            Ok(Event::Text(t)) => {
                if let Some(text) = current.as_mut() {
                    let unescaped = t
                        .unescape()
                        .map_err(|e| SitemapError::Parse(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                if e.local_name().as_ref() == b"loc" {
                    if let Some(text) = current.take() {
                        let trimmed = text.trim();
                        if !trimmed.is_empty() {
                            locations.push(trimmed.to_string());
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SitemapError::Parse(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(SitemapError::Parse("document has no root element".to_string()));
    }

    if depth > 0 {
        return Err(SitemapError::Parse(format!(
            "unexpected end of document with {} unclosed element(s)",
            depth
        )));
    }

    Ok(locations)
}
