// ABOUTME: Environment-based configuration for transport, read queries, cache and alerts
// ABOUTME: Parses RECRUIT_* variables into typed settings with documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration
//!
//! Every setting has a default so an empty environment yields a usable
//! configuration. Values that are present but unparseable are rejected with
//! `ConfigInvalid` rather than silently replaced.

use crate::constants::{alerts, cache, env_config, http, query};
use crate::errors::{AppError, AppResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL resource paths are joined onto
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: http::DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(http::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(http::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// Read-query behaviour
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// How long fetched data is served from cache before it is re-fetched
    pub stale_time: Duration,
    /// Retries after a failed read; mutations never retry
    pub retry_count: u32,
    /// Delay before each read retry
    pub retry_delay: Duration,
    /// Whether watched reads re-fetch on focus
    pub refetch_on_focus: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(query::DEFAULT_STALE_SECS),
            retry_count: query::DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_millis(query::DEFAULT_RETRY_DELAY_MS),
            refetch_on_focus: query::DEFAULT_REFETCH_ON_FOCUS,
        }
    }
}

impl QueryConfig {
    /// Creates a query configuration with the given staleness window and retry count
    #[must_use]
    pub fn new(stale_time: Duration, retry_count: u32) -> Self {
        Self {
            stale_time,
            retry_count,
            ..Self::default()
        }
    }
}

/// Cache sizing
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached query results (LRU eviction beyond)
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: cache::DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Transport settings
    pub http: HttpConfig,
    /// Read-query settings
    pub query: QueryConfig,
    /// Cache settings
    pub cache: CacheConfig,
    /// Base64-encoded payload key, when configured
    pub payload_key: Option<String>,
    /// How long alerts stay visible
    pub alert_duration: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            query: QueryConfig::default(),
            cache: CacheConfig::default(),
            payload_key: None,
            alert_duration: Duration::from_millis(alerts::DEFAULT_ALERT_DURATION_MS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if a variable is set but cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let http = HttpConfig {
            base_url: env::var(env_config::API_BASE_URL)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.http.base_url),
            timeout: parse_env::<u64>(env_config::HTTP_TIMEOUT_SECS)?
                .map_or(defaults.http.timeout, Duration::from_secs),
            connect_timeout: parse_env::<u64>(env_config::HTTP_CONNECT_TIMEOUT_SECS)?
                .map_or(defaults.http.connect_timeout, Duration::from_secs),
        };

        let query = QueryConfig {
            stale_time: parse_env::<u64>(env_config::QUERY_STALE_SECS)?
                .map_or(defaults.query.stale_time, Duration::from_secs),
            retry_count: parse_env::<u32>(env_config::QUERY_RETRY_COUNT)?
                .unwrap_or(defaults.query.retry_count),
            retry_delay: parse_env::<u64>(env_config::QUERY_RETRY_DELAY_MS)?
                .map_or(defaults.query.retry_delay, Duration::from_millis),
            refetch_on_focus: parse_bool_env(env_config::QUERY_REFETCH_ON_FOCUS)?
                .unwrap_or(defaults.query.refetch_on_focus),
        };

        let cache = CacheConfig {
            max_entries: parse_env::<usize>(env_config::CACHE_MAX_ENTRIES)?
                .unwrap_or(defaults.cache.max_entries),
        };

        Ok(Self {
            http,
            query,
            cache,
            payload_key: env::var(env_config::PAYLOAD_KEY)
                .ok()
                .filter(|s| !s.trim().is_empty()),
            alert_duration: parse_env::<u64>(env_config::ALERT_DURATION_MS)?
                .map_or(defaults.alert_duration, Duration::from_millis),
        })
    }
}

/// Parse an optional environment variable, rejecting malformed values
fn parse_env<T: FromStr>(key: &str) -> AppResult<Option<T>> {
    match env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config_invalid(format!("{key} has an invalid value: {raw:?}"))
        }),
        Err(_) => Ok(None),
    }
}

/// Parse an optional boolean flag (`true/false`, `1/0`, `yes/no`)
fn parse_bool_env(key: &str) -> AppResult<Option<bool>> {
    let Ok(raw) = env::var(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(AppError::config_invalid(format!(
            "{key} must be a boolean, got {raw:?}"
        ))),
    }
}
