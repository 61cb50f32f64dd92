// ABOUTME: Cryptography module for encrypted response payloads
// ABOUTME: Centralizes the symmetric key context injected into the orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic utilities for encrypted read payloads

/// AES-256-GCM payload key context
pub mod payload;

pub use payload::CryptoContext;
