mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{ApiConfig, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/fpl-picker/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fpl-picker")
}

/// Get the default config file path (~/.config/fpl-picker/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the directory holding `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// With `None` the default path is used, and a missing file there means
/// defaults. An explicit path must exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    // An empty or comment-only file is an empty mapping
    if content.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
        return Ok(Config::default());
    }
    Ok(serde_saphyr::from_str(content)?)
}

/// Check every section and return all problems at once
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(scoring_errors) = validate_scoring(&config.scoring, &config.filters) {
        errors.extend(scoring_errors);
    }
    errors.extend(config.squad.validate());

    let api = &config.api;
    if !api.base_url.starts_with("http://") && !api.base_url.starts_with("https://") {
        errors.push(format!(
            "api.base_url: must start with http:// or https://, got '{}'",
            api.base_url
        ));
    }
    if let Err(e) = api.timeout_duration() {
        errors.push(format!("api.timeout: invalid duration '{}' - {}", api.timeout, e));
    }
    if let Err(e) = api.cache_ttl_duration() {
        errors.push(format!("api.cache_ttl: invalid duration '{}' - {}", api.cache_ttl, e));
    }
    if api.max_concurrent_requests == 0 {
        errors.push("api.max_concurrent_requests: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
