//! Sitemap discovery
//!
//! This module turns a sitemap index into categorized page URLs:
//! - Namespace-agnostic `<loc>` extraction from sitemap XML
//! - Pattern-based categorization of sitemap URLs
//! - Collection of page URLs across every child sitemap

mod category;
mod collector;
mod parser;

pub use category::{categorize, Category, CategoryMap};
pub use collector::{collect_categorized_urls, CategorizedUrls};
pub use parser::parse_locations;
