use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::fpl::DEFAULT_BASE_URL;
use crate::optimize::SquadRules;
use crate::scoring::{FilterConfig, ScoringConfig};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub scoring: ScoringConfig,
    pub filters: FilterConfig,
    pub squad: SquadRules,
}

/// How the FPL API is reached.
///
/// Example YAML:
/// ```yaml
/// api:
///   base_url: https://fantasy.premierleague.com/api
///   timeout: 30s
///   max_concurrent_requests: 10
///   cache_ttl: 1h
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,

    /// Per-request timeout, humantime format ("30s")
    pub timeout: String,

    /// Player histories fetched at once
    pub max_concurrent_requests: usize,

    /// How long cached responses stay fresh, humantime format ("1h", "15m")
    pub cache_ttl: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: "30s".to_string(),
            max_concurrent_requests: 10,
            cache_ttl: "1h".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn timeout_duration(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.timeout)
    }

    pub fn cache_ttl_duration(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.cache_ttl)
    }
}
