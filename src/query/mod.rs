// ABOUTME: Read-query parameter model and resolution against shared search state
// ABOUTME: Exposes explicit overrides, resolved parameters and wire serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query parameter handling for READ invocations

/// Explicit overrides, resolution and stripping
pub mod params;

pub use params::{QueryDefaults, ResolvedQuery};
