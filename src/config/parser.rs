use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// The file is validated after parsing. Sections and keys that are absent
/// keep their built-in defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use wlw_scraper::config::load_config;
///
/// let config = load_config(Path::new("config/settings.toml")).unwrap();
/// println!("Max pages: {}", config.search.max_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses settings from a TOML string without validating them
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Loads the settings file, falling back to defaults when it does not exist
///
/// A file that exists but cannot be read or parsed is still an error. The
/// result is not validated: command-line overrides may still replace values,
/// so call [`validate`] once they are applied.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::warn!(
            "Settings file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(Config::default());
    }
    read_config(path)
}

/// Computes a SHA-256 fingerprint of the settings file content
///
/// Logged at startup so a run can be matched to the settings it used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads an unvalidated configuration and returns it with its fingerprint
///
/// The fingerprint is `None` when the file does not exist and defaults were
/// used.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, Option<String>), ConfigError> {
    let config = load_config_or_default(path)?;
    let hash = if path.exists() {
        Some(compute_config_hash(path)?)
    } else {
        None
    };
    Ok((config, hash))
}
