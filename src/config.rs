//! Client configuration parsed from environment variables.
//!
//! Native hosts read the process environment at startup; browser builds bake
//! the same variables in at compile time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

const API_URL_VAR: &str = "API_URL";
const STORE_PATH_VAR: &str = "SESSION_STORE_PATH";
const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value} (expected an http:// or https:// URL)")]
    InvalidUrl { var: &'static str, value: String },

    #[error("invalid {var}: {value}")]
    InvalidLogLevel { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base address without a trailing slash.
    pub api_url: String,
    /// JSON file backing the durable store on native hosts; in-memory when
    /// unset.
    pub store_path: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.to_owned(), store_path: None, log_level: DEFAULT_LOG_LEVEL }
    }
}

impl ClientConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `API_URL`: default `http://localhost:8000`
    /// - `SESSION_STORE_PATH`: JSON file for the native durable store
    /// - `LOG_LEVEL`: `error`..`trace`, default `info`
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from variables captured at compile time.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                API_URL_VAR => option_env!("API_URL"),
                STORE_PATH_VAR => option_env!("SESSION_STORE_PATH"),
                LOG_LEVEL_VAR => option_env!("LOG_LEVEL"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary variable source. Blank values count as
    /// unset.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let api_url = match var(API_URL_VAR) {
            Some(url) => parse_api_url(&url)?,
            None => DEFAULT_API_URL.to_owned(),
        };
        let store_path = var(STORE_PATH_VAR).map(PathBuf::from);
        let log_level = match var(LOG_LEVEL_VAR) {
            Some(level) => level
                .parse::<log::LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel { var: LOG_LEVEL_VAR, value: level.clone() })?,
            None => DEFAULT_LOG_LEVEL,
        };

        Ok(Self { api_url, store_path, log_level })
    }

    /// Install `log_level` as the global `log` ceiling.
    pub fn apply_log_level(&self) {
        log::set_max_level(self.log_level);
        log::debug!("log level set to {}", self.log_level);
    }
}

fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim_end_matches('/');
    let has_host = ["http://", "https://"]
        .iter()
        .any(|scheme| url.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
    if !has_host {
        return Err(ConfigError::InvalidUrl { var: API_URL_VAR, value: raw.to_owned() });
    }
    Ok(url.to_owned())
}
