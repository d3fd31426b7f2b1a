//! Run summary counters and console printout

use crate::crawler::Termination;
use crate::model::{Mode, Region, SearchQuery};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Counters and outcome of one run
#[derive(Debug)]
pub struct RunSummary {
    /// Search term of the run
    pub query: String,
    pub mode: Mode,
    pub region: Region,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Result pages fetched successfully
    pub pages_fetched: u32,

    /// Listing cards seen across all pages
    pub listings_seen: usize,

    /// Records kept after deduplication
    pub records_collected: usize,

    /// Listing cards dropped for lack of an identifier
    pub malformed_skipped: usize,

    /// Listings dropped because their identifier was already collected
    pub duplicates_dropped: usize,

    /// Profile fetches attempted
    pub detail_fetches: usize,

    /// Profile fetches that failed; the listing fields were kept
    pub detail_failures: usize,

    /// Why the walk ended
    pub termination: Option<Termination>,

    /// Where the records were written
    pub output_path: Option<PathBuf>,

    /// Fingerprint of the settings file, when one was loaded
    pub config_hash: Option<String>,
}

impl RunSummary {
    /// Starts a summary for a run of `query`
    pub fn new(query: &SearchQuery) -> Self {
        Self {
            query: query.query.clone(),
            mode: query.mode,
            region: query.region,
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            listings_seen: 0,
            records_collected: 0,
            malformed_skipped: 0,
            duplicates_dropped: 0,
            detail_fetches: 0,
            detail_failures: 0,
            termination: None,
            output_path: None,
            config_hash: None,
        }
    }

    /// Marks the walk as finished
    pub fn finish(&mut self, pages_fetched: u32, termination: Option<Termination>) {
        self.pages_fetched = pages_fetched;
        self.termination = termination;
        self.finished_at = Some(Utc::now());
    }

    /// Returns true if a page fetch failure cut the walk short
    pub fn is_partial(&self) -> bool {
        self.termination.as_ref().is_some_and(Termination::is_failure)
    }

    /// Run time in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the run summary to stdout
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    println!("Search:");
    println!("  Query: {}", summary.query);
    println!("  Mode: {}", summary.mode);
    println!("  Region: {}", summary.region);
    println!();

    println!("Pages:");
    println!("  Fetched: {}", summary.pages_fetched);
    match &summary.termination {
        Some(termination) => println!("  Stopped: {}", termination),
        None => println!("  Stopped: not started"),
    }
    println!();

    println!("Records:");
    println!("  Listings seen: {}", summary.listings_seen);
    println!("  Collected: {}", summary.records_collected);
    println!("  Skipped (malformed): {}", summary.malformed_skipped);
    println!("  Duplicates dropped: {}", summary.duplicates_dropped);
    if summary.detail_fetches > 0 {
        println!(
            "  Profiles enriched: {} / {}",
            summary.detail_fetches - summary.detail_failures,
            summary.detail_fetches
        );
    }
    println!();

    if let Some(path) = &summary.output_path {
        println!("Output: {}", path.display());
    }
    if summary.is_partial() {
        println!("Result is partial: the walk ended on a fetch failure");
    }
}
