// ABOUTME: Re-exports application constants from recruit-core
// ABOUTME: Wire names, defaults and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application constants, defined in `recruit-core`

pub use recruit_core::constants::*;
