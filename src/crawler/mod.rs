//! Crawler module for walking the marketplace
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with throttling and retry logic
//! - The forward-only walk over search result pages
//! - Profile fetches for company enrichment
//! - Overall run coordination

mod coordinator;
mod dedup;
mod detail;
mod fetcher;
mod walker;

pub use coordinator::{run_scrape, Coordinator};
pub use dedup::RecordSet;
pub use detail::DetailFetcher;
pub use fetcher::{build_http_client, Fetcher, RetryPolicy};
pub use walker::{PageWalker, RawPage, Termination};
