//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating the TOML settings
//! file and layering command-line overrides on top of it.
//!
//! # Example
//!
//! ```no_run
//! use wlw_scraper::config::{load_config_or_default, search_query};
//! use std::path::Path;
//!
//! let config = load_config_or_default(Path::new("config/settings.toml")).unwrap();
//! let query = search_query(&config).unwrap();
//! println!("Searching '{}' in {}", query.query, query.region);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, Overrides, SearchConfig, SiteConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_or_default, load_config_with_hash, parse_config,
};
pub use validation::{base_url, search_query, validate};
