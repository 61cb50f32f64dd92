// ABOUTME: Re-exports the unified error system from recruit-core
// ABOUTME: Keeps `crate::errors` paths stable for library consumers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Error types live in the `recruit-core` crate so the CLI and the library share
//! one definition. This module re-exports them.

pub use recruit_core::errors::{AppError, AppResult, ErrorCode, ErrorContext};
