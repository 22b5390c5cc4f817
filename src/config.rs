//! Client configuration: API base URL and log level.
//!
//! Values come from the process environment when there is one (native
//! builds, tests) and otherwise from the environment captured at build time,
//! which is the only source available to a WASM bundle.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_LEVEL: log::Level = log::Level::Info;

const API_BASE_URL_VAR: &str = "KLASSTRA_API_BASE_URL";
const LOG_LEVEL_VAR: &str = "KLASSTRA_LOG_LEVEL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidBaseUrl { var: &'static str, value: String },
    #[error("{var} must be one of error, warn, info, debug, trace; got '{value}'")]
    InvalidLogLevel { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub log_level: log::Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `KLASSTRA_API_BASE_URL`: default `http://localhost:8000`
    /// - `KLASSTRA_LOG_LEVEL`: default `info`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| build_time_var(key).map(str::to_owned))
        })
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url = match lookup(API_BASE_URL_VAR) {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_API_BASE_URL.to_owned(),
        };
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(raw) => parse_log_level(&raw)?,
            None => DEFAULT_LOG_LEVEL,
        };
        Ok(Self {
            api_base_url,
            log_level,
        })
    }
}

fn build_time_var(key: &str) -> Option<&'static str> {
    match key {
        API_BASE_URL_VAR => option_env!("KLASSTRA_API_BASE_URL"),
        LOG_LEVEL_VAR => option_env!("KLASSTRA_LOG_LEVEL"),
        _ => None,
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidBaseUrl {
            var: API_BASE_URL_VAR,
            value: raw.to_owned(),
        }),
    }
}

fn parse_log_level(raw: &str) -> Result<log::Level, ConfigError> {
    raw.trim()
        .parse::<log::Level>()
        .map_err(|_| ConfigError::InvalidLogLevel {
            var: LOG_LEVEL_VAR,
            value: raw.to_owned(),
        })
}
