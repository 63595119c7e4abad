//! Runtime configuration.
//!
//! Defaults point at the public disease.sh API. The base URL and request
//! timeout may be overridden through the environment; the cache TTL is fixed.

use crate::error::{Result, TrackerError};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CACHE_TTL_SECS: u64 = 60 * 30;

pub const BASE_URL_ENV: &str = "DISEASE_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "DISEASE_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(CACHE_TTL_SECS),
        }
    }
}

impl Config {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(BASE_URL_ENV) {
            config.base_url = parse_base_url(&raw)?;
            debug!("Using base URL from {}: {}", BASE_URL_ENV, config.base_url);
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(parse_timeout_secs(&raw)?);
        }

        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| TrackerError::Config(format!("{BASE_URL_ENV} is not a valid URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(TrackerError::Config(format!(
            "{BASE_URL_ENV} cannot be used as a base URL"
        )));
    }
    Ok(trimmed.to_string())
}

fn parse_timeout_secs(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(TrackerError::Config(format!(
            "{TIMEOUT_ENV} must be an integer > 0"
        ))),
    }
}
