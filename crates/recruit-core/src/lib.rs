// ABOUTME: Core types and constants for the recruit-query request orchestrator
// ABOUTME: Foundation crate with error handling and wire-level constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Recruit Core
//!
//! Foundation crate shared by the `recruit-query` library and its CLI. It is
//! designed to change infrequently so the workspace recompiles incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Wire names, defaults and environment variable names

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;
