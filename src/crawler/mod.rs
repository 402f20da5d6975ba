//! Crawler module for list and detail page processing
//!
//! This module contains the scraping pipeline:
//! - HTTP fetching with a fixed header set
//! - HTML parsing into queryable documents
//! - Detail link extraction from list pages
//! - Record extraction from detail pages
//! - Randomized pacing between requests
//! - Overall run coordination

mod coordinator;
mod detail_page;
mod document;
mod fetcher;
mod list_page;
mod pacer;

pub use coordinator::{run_scrape, Coordinator, RunSummary};
pub use detail_page::{DetailPageExtractor, TOTAL_PRICE_UNIT};
pub use document::Document;
pub use fetcher::{build_http_client, Fetcher};
pub use list_page::ListPageExtractor;
pub use pacer::Pacer;
