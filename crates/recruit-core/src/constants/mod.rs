// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Wire parameter names, query defaults, cache sizing and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constants module
//!
//! Constants are grouped by domain rather than kept in a single flat list.

/// Query-string parameter names understood by the backend
pub mod query_params {
    /// Free-text search keyword
    pub const KEYWORD: &str = "keyword";
    /// One-based page number
    pub const PAGE_NUMBER: &str = "pageNumber";
    /// Page size
    pub const PAGE_LIMIT: &str = "pageLimit";
    /// Filter expression (`field;value` clauses joined with `|`)
    pub const FILTER_OPTIONS: &str = "filterOptions";
    /// Sort expression
    pub const SORT_OPTIONS: &str = "sortOptions";
    /// Related entities to include
    pub const INCLUDE_OPTIONS: &str = "includeOptions";

    /// Separator used when composing explicit and shared filters
    pub const FILTER_SEPARATOR: char = '|';
}

/// Defaults for read queries
pub mod query {
    /// Staleness window before a cached read is re-fetched (5 minutes)
    pub const DEFAULT_STALE_SECS: u64 = 300;
    /// Number of retries after a failed read
    pub const DEFAULT_RETRY_COUNT: u32 = 1;
    /// Delay between read retries in milliseconds
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;
    /// Whether watched reads re-fetch when the window regains focus
    pub const DEFAULT_REFETCH_ON_FOCUS: bool = false;
}

/// Cache sizing
pub mod cache {
    /// Default maximum number of cached query results
    pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000;
    /// Separator between cache key segments in their string form
    pub const KEY_SEPARATOR: char = ':';
    /// Capacity of the invalidation / focus broadcast channels
    pub const BROADCAST_CAPACITY: usize = 100;
}

/// HTTP transport settings
pub mod http {
    /// Default backend base URL
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connection timeout in seconds
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Header carrying the per-invocation request ID
    pub const REQUEST_ID_HEADER: &str = "x-request-id";
    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("recruit-query/", env!("CARGO_PKG_VERSION"));
}

/// Alert presentation defaults
pub mod alerts {
    /// How long an alert stays visible, in milliseconds
    pub const DEFAULT_ALERT_DURATION_MS: u64 = 3_000;
}

/// Payload encryption parameters
pub mod crypto {
    /// AES-256 key length in bytes
    pub const KEY_LEN: usize = 32;
    /// AES-GCM nonce length in bytes
    pub const NONCE_LEN: usize = 12;
}

/// Environment variable names
pub mod env_config {
    /// Backend base URL
    pub const API_BASE_URL: &str = "RECRUIT_API_BASE_URL";
    /// Base64-encoded 32-byte payload decryption key
    pub const PAYLOAD_KEY: &str = "RECRUIT_PAYLOAD_KEY";
    /// Request timeout in seconds
    pub const HTTP_TIMEOUT_SECS: &str = "RECRUIT_HTTP_TIMEOUT_SECS";
    /// Connection timeout in seconds
    pub const HTTP_CONNECT_TIMEOUT_SECS: &str = "RECRUIT_HTTP_CONNECT_TIMEOUT_SECS";
    /// Staleness window in seconds
    pub const QUERY_STALE_SECS: &str = "RECRUIT_QUERY_STALE_SECS";
    /// Read retry count
    pub const QUERY_RETRY_COUNT: &str = "RECRUIT_QUERY_RETRY_COUNT";
    /// Delay between read retries in milliseconds
    pub const QUERY_RETRY_DELAY_MS: &str = "RECRUIT_QUERY_RETRY_DELAY_MS";
    /// Re-fetch watched reads on focus
    pub const QUERY_REFETCH_ON_FOCUS: &str = "RECRUIT_QUERY_REFETCH_ON_FOCUS";
    /// Maximum cached entries
    pub const CACHE_MAX_ENTRIES: &str = "RECRUIT_CACHE_MAX_ENTRIES";
    /// Alert duration in milliseconds
    pub const ALERT_DURATION_MS: &str = "RECRUIT_ALERT_DURATION_MS";
}

/// Service identity used in logs
pub mod service_names {
    /// Name reported in structured startup logs
    pub const RECRUIT_QUERY: &str = "recruit-query";
}
