// ABOUTME: Configuration module for the request orchestrator and its HTTP transport
// ABOUTME: Environment-only configuration with typed defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the recruit-query client
//!
//! - **Environment**: [`ClientConfig`] loaded from `RECRUIT_*` environment variables

/// Environment and client configuration
pub mod environment;

pub use environment::{CacheConfig, ClientConfig, HttpConfig, QueryConfig};
