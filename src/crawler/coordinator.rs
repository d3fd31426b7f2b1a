//! Run coordinator - main scrape orchestration logic
//!
//! This module contains the main scrape loop that coordinates:
//! - Walking the search result pages
//! - Extracting listing records from each page
//! - Deduplicating records by identifier
//! - Enriching new company records from their profile pages
//! - Writing the record file and the optional run report

use crate::config::{base_url, search_query, validate, Config};
use crate::crawler::{DetailFetcher, Fetcher, PageWalker, RawPage, RecordSet};
use crate::extract::{parse_company_list, parse_product_list, ExtractedPage};
use crate::model::{Mode, Record, SearchQuery};
use crate::output::{write_markdown_report, write_records, RunSummary};
use crate::ScrapeError;
use url::Url;

/// Main scrape coordinator structure
pub struct Coordinator {
    config: Config,
    query: SearchQuery,
    base_url: Url,
    fetcher: Fetcher,
    config_hash: Option<String>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The effective configuration, overrides applied
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Configuration is valid and the client is built
    /// * `Err(ScrapeError)` - Invalid configuration or client build failure
    pub fn new(config: Config) -> Result<Self, ScrapeError> {
        validate(&config)?;
        let query = search_query(&config)?;
        let base_url = base_url(&config)?;
        let fetcher = Fetcher::new(&config.http)?;

        Ok(Self {
            config,
            query,
            base_url,
            fetcher,
            config_hash: None,
        })
    }

    /// Records the settings file fingerprint in the run summary
    pub fn with_config_hash(mut self, hash: Option<String>) -> Self {
        self.config_hash = hash;
        self
    }

    /// Returns the query this coordinator runs
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Walks all result pages and returns the collected records
    ///
    /// Nothing is written. A page fetch failure ends the walk early and is
    /// reported through the summary's termination reason; records collected
    /// so far are returned.
    pub async fn collect(&self) -> Result<(Vec<Record>, RunSummary), ScrapeError> {
        let mut summary = RunSummary::new(&self.query);
        summary.config_hash = self.config_hash.clone();

        let mut walker = PageWalker::new(&self.fetcher, &self.query, &self.base_url);
        let details = DetailFetcher::new(&self.fetcher, &self.base_url, self.query.language);
        let mut records = RecordSet::new();

        tracing::info!(
            "Searching {} listings for '{}' in {} ({} page limit)",
            self.query.mode,
            self.query.query,
            self.query.region,
            if self.query.max_pages == 0 {
                "no".to_string()
            } else {
                self.query.max_pages.to_string()
            }
        );

        while let Some(page) = walker.next_page().await {
            let extracted = self.extract(&page)?;
            walker.observe_listings(extracted.listings);

            summary.listings_seen += extracted.listings;
            summary.malformed_skipped += extracted.skipped;

            let mut added = 0;
            for mut record in extracted.records {
                if records.contains(record.identifier()) {
                    tracing::debug!("Dropping duplicate listing {}", record.identifier());
                    summary.duplicates_dropped += 1;
                    continue;
                }

                if self.query.fetches_details() {
                    if let Record::Company(company) = &mut record {
                        summary.detail_fetches += 1;
                        if !details.enrich(company).await {
                            summary.detail_failures += 1;
                        }
                    }
                }

                if records.insert(record) {
                    added += 1;
                }
            }

            tracing::info!(
                "Page {}: {} listing(s), {} new record(s)",
                page.number,
                extracted.listings,
                added
            );
        }

        summary.records_collected = records.len();
        summary.finish(walker.pages_fetched(), walker.into_termination());

        Ok((records.into_records(), summary))
    }

    /// Runs the scrape and writes its output
    ///
    /// The record file is written even when the walk ended on a fetch
    /// failure. A write failure is returned as an error.
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let (records, mut summary) = self.collect().await?;

        let output_path = self.config.output.output_path();
        write_records(&records, &output_path)?;
        summary.output_path = Some(output_path);

        if let Some(report_path) = &self.config.output.summary_path {
            write_markdown_report(&summary, report_path)?;
            tracing::info!("Run report written to {}", report_path.display());
        }

        if summary.is_partial() {
            tracing::warn!(
                "Walk ended early, output holds {} record(s) from {} page(s)",
                summary.records_collected,
                summary.pages_fetched
            );
        }

        Ok(summary)
    }

    fn extract(&self, page: &RawPage) -> Result<ExtractedPage<Record>, ScrapeError> {
        let extracted = match self.query.mode {
            Mode::Company => parse_company_list(&page.body, &self.base_url, self.query.region)?
                .map(Record::from),
            Mode::Product => parse_product_list(&page.body, &self.base_url, self.query.region)?
                .map(Record::from),
        };
        Ok(extracted)
    }
}

/// Runs a complete scrape with the given configuration
///
/// # Example
///
/// ```no_run
/// use wlw_scraper::config::load_config;
/// use wlw_scraper::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config/settings.toml"))?;
/// let summary = run_scrape(config).await?;
/// println!("{} records", summary.records_collected);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<RunSummary, ScrapeError> {
    Coordinator::new(config)?.run().await
}
