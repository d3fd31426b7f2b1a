//! wlw-scraper main entry point
//!
//! This is the command-line interface for the "Wer liefert was" listing
//! scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wlw_scraper::config::{base_url, load_config_with_hash, search_query, validate, Config, Overrides};
use wlw_scraper::crawler::Coordinator;
use wlw_scraper::output::print_summary;
use wlw_scraper::url::search_url;
use wlw_scraper::{Language, Mode, Region};

/// wlw-scraper: company and product listings from wlw.de
///
/// Walks the marketplace's search result pages for a query, extracts each
/// listing into a structured record, optionally enriches companies from
/// their profile pages, and writes the records as a JSON file.
#[derive(Parser, Debug)]
#[command(name = "wlw-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes company and product listings from wlw.de", long_about = None)]
struct Cli {
    /// Search term
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// Listing type to collect (company or product)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Country filter (DE, AT, CH, BE, LU)
    #[arg(short, long)]
    region: Option<Region>,

    /// Site language (de or en)
    #[arg(short, long)]
    language: Option<Language>,

    /// Maximum number of result pages, 0 for unlimited
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Skip fetching company profile pages
    #[arg(long)]
    no_details: bool,

    /// Path to TOML settings file
    #[arg(short, long, value_name = "PATH", default_value = "config/settings.toml")]
    config: PathBuf,

    /// Output JSON file (overrides the settings file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show the first search URL without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            query: self.query.clone(),
            mode: self.mode,
            region: self.region,
            language: self.language,
            max_pages: self.max_pages,
            no_details: self.no_details,
            output: self.output.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading settings from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load settings from {}", cli.config.display()))?;
    if let Some(hash) = &config_hash {
        tracing::info!("Settings loaded (hash: {})", hash);
    }

    config.apply_overrides(cli.overrides());
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let coordinator = Coordinator::new(config)
        .context("Failed to start scrape")?
        .with_config_hash(config_hash);

    let summary = coordinator.run().await.context("Scrape failed")?;

    if !cli.quiet {
        print_summary(&summary);
    }

    if summary.is_partial() {
        tracing::error!("Scrape ended early; the output file holds a partial result");
        std::process::exit(2);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wlw_scraper=info,warn"),
            1 => EnvFilter::new("wlw_scraper=debug,info"),
            2 => EnvFilter::new("wlw_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates settings and shows what would be fetched
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let query = search_query(config)?;
    let base = base_url(config)?;
    let first_page = search_url(&base, &query, 1)?;

    println!("=== wlw-scraper Dry Run ===\n");

    println!("Search:");
    println!("  Query: {}", query.query);
    println!("  Mode: {}", query.mode);
    println!("  Region: {}", query.region);
    println!("  Language: {}", query.language);
    if query.max_pages == 0 {
        println!("  Max pages: unlimited");
    } else {
        println!("  Max pages: {}", query.max_pages);
    }
    println!("  Company profiles: {}", query.fetches_details());

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!(
        "  Retries: {} (backoff {}ms, doubling)",
        config.http.retries, config.http.backoff_ms
    );
    println!("  Request delay: {}ms", config.http.request_delay_ms);

    println!("\nOutput:");
    println!("  Records: {}", config.output.output_path().display());
    if let Some(report) = &config.output.summary_path {
        println!("  Report: {}", report.display());
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start with: {}", first_page);

    Ok(())
}
