use crate::config::types::{Config, HttpConfig, OutputConfig, SearchConfig, SiteConfig};
use crate::model::SearchQuery;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_search_config(&config.search)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Builds the immutable search query for a run
///
/// Fails if no search term was configured.
pub fn search_query(config: &Config) -> Result<SearchQuery, ConfigError> {
    let query = config
        .search
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            ConfigError::Validation(
                "No search query provided. Use --query or set 'query' in the [search] section"
                    .to_string(),
            )
        })?;

    Ok(SearchQuery {
        query: query.to_string(),
        mode: config.search.mode,
        region: config.search.region,
        language: config.search.language,
        max_pages: config.search.max_pages,
        include_details: config.search.include_company_details,
    })
}

/// Parses and checks the marketplace base URL
pub fn base_url(config: &Config) -> Result<Url, ConfigError> {
    parse_base_url(&config.site)
}

fn parse_base_url(config: &SiteConfig) -> Result<Url, ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    Ok(url)
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    parse_base_url(config).map(|_| ())
}

fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    // the query may still arrive from the command line, so only reject blanks
    if let Some(query) = &config.query {
        if query.trim().is_empty() {
            return Err(ConfigError::Validation(
                "query cannot be blank".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.retries > 10 {
        return Err(ConfigError::Validation(format!(
            "retries must be at most 10, got {}",
            config.retries
        )));
    }

    if config.backoff_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "backoff-ms must be at most 60000, got {}",
            config.backoff_ms
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_filename.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output-filename cannot be empty".to_string(),
        ));
    }

    if let Some(summary) = &config.summary_path {
        if summary.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "summary-path cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
