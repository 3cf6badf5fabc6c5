//! Crawler module for fetching and pipeline orchestration
//!
//! This module contains the network-facing side of the audit, including:
//! - HTTP fetching with a single shared client
//! - HTML parsing for canonical links
//! - Pacing between sequential requests
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_audit, Coordinator};
pub use fetcher::{build_http_client, fetch_page, fetch_sitemap_document, fetch_status, FetchResult};
pub use parser::find_canonical_href;
pub use scheduler::RequestPacer;
