use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::debug;

use super::cache::ResponseCache;
use super::models::{BootstrapStatic, ElementSummary};
use super::types::Fixture;

pub const DEFAULT_BASE_URL: &str = "https://fantasy.premierleague.com/api";

const USER_AGENT: &str = concat!("fpl-picker/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    RateLimited,
    Unavailable(StatusCode),
    Status(StatusCode, String),
    Transport(String),
}

impl ApiError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited | ApiError::Unavailable(_) | ApiError::Transport(_)
        )
    }

    fn from_status(status: StatusCode, url: &str) -> Self {
        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound(url.to_string())
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimited
        } else if status.is_server_error() {
            ApiError::Unavailable(status)
        } else {
            ApiError::Status(status, url.to_string())
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(url) => write!(f, "Not found: {}", url),
            ApiError::RateLimited => {
                write!(f, "FPL API rate limit exceeded. Wait a few minutes and try again.")
            }
            ApiError::Unavailable(status) => write!(
                f,
                "FPL API unavailable ({}). The game may be updating, try again later.",
                status
            ),
            ApiError::Status(status, url) => write!(f, "FPL API error {} for {}", status, url),
            ApiError::Transport(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Waits between attempts: 3 attempts in all, backing off 100ms then 200ms
fn retry_delays() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(Duration::from_secs(5))
        .take(2)
}

/// Thin client over the public FPL endpoints, with retries and an optional
/// disk response cache.
#[derive(Clone, Debug)]
pub struct FplClient {
    http: reqwest::Client,
    base_url: String,
    cache: Option<ResponseCache>,
}

impl FplClient {
    pub fn new(base_url: &str, timeout: Duration, cache: Option<ResponseCache>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch players, teams and gameweeks
    pub async fn fetch_bootstrap(&self) -> Result<BootstrapStatic> {
        self.get_json("bootstrap-static/")
            .await
            .context("Failed to fetch player data")
    }

    /// Fetch every fixture of the season
    pub async fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
        self.get_json("fixtures/")
            .await
            .context("Failed to fetch fixtures")
    }

    /// Fetch a player's gameweek-by-gameweek history
    pub async fn fetch_player_history(&self, player_id: u32) -> Result<ElementSummary> {
        self.get_json(&format!("element-summary/{}/", player_id))
            .await
            .with_context(|| format!("Failed to fetch history for player {}", player_id))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.read_fresh(&url) {
                match serde_json::from_value(body) {
                    Ok(value) => {
                        debug!(%url, "cache hit");
                        return Ok(value);
                    }
                    Err(e) => debug!(%url, error = %e, "ignoring unreadable cache entry"),
                }
            }
        }

        let body = self.get_with_retry(&url).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.write(&url, &body) {
                debug!(%url, error = %e, "cache write failed");
            }
        }

        serde_json::from_value(body).with_context(|| format!("Unexpected response shape from {}", url))
    }

    async fn get_with_retry(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        let http = &self.http;
        RetryIf::start(
            retry_delays(),
            || async move {
                debug!(%url, "GET");
                let response = http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| ApiError::Transport(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(ApiError::from_status(status, url));
                }

                response
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| ApiError::Transport(format!("invalid JSON from {}: {}", url, e)))
            },
            |e: &ApiError| e.is_retryable(),
        )
        .await
    }
}
