// ABOUTME: Main library entry point for the recruit-query request orchestrator
// ABOUTME: Layered query defaults, encrypted read payloads, cache invalidation and mutation side effects
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Recruit Query
//!
//! Data-access core of the athlete-recruiting web client. One generic
//! orchestrator performs every backend call the views make.
//!
//! ## Features
//!
//! - **Layered query defaults**: each read field takes an explicit override or
//!   the shared search state value at call time; filters compose with `|`
//! - **Encrypted payloads**: string payloads on reads are AES-256-GCM
//!   ciphertext, decrypted with an injected, rotatable key
//! - **Query cache**: LRU-bounded, staleness-aware, invalidated by mutations
//! - **Mutation side effects**: success alert, invalidation, redirect and
//!   callback, always in that order; exactly one alert per failure
//! - **Watched reads**: interval, invalidation and focus driven refetching
//!
//! ## Architecture
//!
//! - **Orchestrator**: [`orchestrator::RequestOrchestrator`] and the
//!   [`orchestrator::Operation`] it runs
//! - **Transport**: [`transport::HttpTransport`] with a `reqwest` implementation
//! - **Cache**: [`cache::CacheClient`] with an in-memory implementation
//! - **Collaborators**: search state, alerts and navigation behind traits
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recruit_query::config::ClientConfig;
//! use recruit_query::orchestrator::{ReadConfig, RequestOrchestrator};
//! use recruit_query::query::QueryDefaults;
//! use recruit_query::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let orchestrator = RequestOrchestrator::from_config(&ClientConfig::from_env()?)?;
//!
//!     let read = ReadConfig::new("/athletes", "athletes")
//!         .defaults(QueryDefaults::default().filter("sport;baseball").page_limit(20));
//!     let envelope = orchestrator.read(&read, None).await?;
//!
//!     println!("{} athletes", envelope.metadata.map_or(0, |m| m.total_count));
//!     Ok(())
//! }
//! ```

/// Query cache trait, keys and in-memory implementation
pub mod cache;

/// Environment-based client configuration
pub mod config;

/// Wire names, defaults and environment variable names
pub mod constants;

/// Payload encryption context
pub mod crypto;

/// Backend response envelope
pub mod envelope;

/// Error types
pub mod errors;

/// Tracing subscriber setup
pub mod logging;

/// Redirect target abstraction
pub mod navigation;

/// User-facing alerts
pub mod notifications;

/// Request orchestration
pub mod orchestrator;

/// Read parameter resolution
pub mod query;

/// Shared search state
pub mod search_state;

/// HTTP transport
pub mod transport;
