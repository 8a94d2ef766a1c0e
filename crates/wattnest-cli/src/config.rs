//! Client configuration from the environment

use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const URL_VAR: &str = "WATTNEST_URL";
const TOKEN_VAR: &str = "WATTNEST_TOKEN";
const TIMEOUT_VAR: &str = "WATTNEST_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid backend URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Backend URL must be http or https: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid timeout '{0}', expected whole seconds")]
    InvalidTimeout(String),
}

/// Where and how to reach the backend
#[derive(Debug, Clone)]
pub struct Config {
    /// API root; always ends with `/` so endpoints join beneath it
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Config {
    /// Read `WATTNEST_URL`, `WATTNEST_TOKEN` and `WATTNEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&lookup(URL_VAR).unwrap_or_else(|| DEFAULT_URL.to_string()))?;
        let token = lookup(TOKEN_VAR).filter(|t| !t.trim().is_empty());
        let timeout = match lookup(TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
        };

        Ok(Self {
            base_url,
            token,
            timeout,
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        url: Option<&str>,
        token: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = url {
            self.base_url = parse_base_url(url)?;
        }
        if token.is_some() {
            self.token = token;
        }
        Ok(self)
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let mut normalized = value.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let url = Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
