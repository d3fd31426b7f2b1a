use crate::model::{Language, Mode, Region};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub search: SearchConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Marketplace location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the marketplace, e.g. `https://www.wlw.de`
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Search parameters for a run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Free-text search term; must be set here or on the command line
    pub query: Option<String>,

    pub mode: Mode,

    pub region: Region,

    pub language: Language,

    /// Maximum number of result pages, 0 for unlimited
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Fetch each company's profile page for contacts, certificates and VAT ID
    #[serde(rename = "include-company-details")]
    pub include_company_details: bool,
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Additional attempts after the first failed one
    pub retries: u32,

    /// Base backoff delay, doubled after each failed attempt (milliseconds)
    #[serde(rename = "backoff-ms")]
    pub backoff_ms: u64,

    /// Minimum time between two consecutive requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for relative output filenames
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// JSON file name, or an absolute path
    #[serde(rename = "output-filename")]
    pub output_filename: PathBuf,

    /// Optional markdown run report
    #[serde(rename = "summary-path")]
    pub summary_path: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.wlw.de".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: None,
            mode: Mode::Company,
            region: Region::De,
            language: Language::De,
            max_pages: 1,
            include_company_details: true,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/119.0 Safari/537.36"
                .to_string(),
            accept_language: "de,en;q=0.8".to_string(),
            timeout_secs: 20,
            retries: 3,
            backoff_ms: 500,
            request_delay_ms: 0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            output_filename: PathBuf::from("sample_output.json"),
            summary_path: None,
        }
    }
}

impl OutputConfig {
    /// Resolves the JSON output path
    ///
    /// An absolute `output_filename` is used as is; a relative one is placed
    /// under `output_dir`.
    pub fn output_path(&self) -> PathBuf {
        if self.output_filename.is_absolute() {
            self.output_filename.clone()
        } else {
            self.output_dir.join(&self.output_filename)
        }
    }
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub query: Option<String>,
    pub mode: Option<Mode>,
    pub region: Option<Region>,
    pub language: Option<Language>,
    pub max_pages: Option<u32>,
    pub no_details: bool,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Applies command-line overrides on top of the loaded settings
    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(query) = overrides.query {
            self.search.query = Some(query);
        }
        if let Some(mode) = overrides.mode {
            self.search.mode = mode;
        }
        if let Some(region) = overrides.region {
            self.search.region = region;
        }
        if let Some(language) = overrides.language {
            self.search.language = language;
        }
        if let Some(max_pages) = overrides.max_pages {
            self.search.max_pages = max_pages;
        }
        if overrides.no_details {
            self.search.include_company_details = false;
        }
        if let Some(output) = overrides.output {
            // taken relative to the working directory, not output-dir
            self.output.output_dir = PathBuf::new();
            self.output.output_filename = output;
        }
    }
}
