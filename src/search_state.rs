// ABOUTME: Shared search state read as late-bound defaults by READ invocations
// ABOUTME: Provider trait plus a thread-safe store with per-field setters
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared search state
//!
//! The UI writes the last-used keyword, pagination, filter, sort and include
//! values here; every READ snapshots it at call time for any field it does
//! not override explicitly.

use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};

/// Snapshot of the shared search values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    /// Free-text search keyword
    pub search: Option<String>,
    /// One-based page number
    pub page_number: Option<u32>,
    /// Page size
    pub page_limit: Option<u32>,
    /// Filter expression
    pub filter: Option<String>,
    /// Sort expression
    pub sort: Option<String>,
    /// Related entities to include
    pub include: Option<String>,
}

/// Source of the current search state
pub trait SearchStateProvider: Send + Sync {
    /// Take a consistent snapshot of the current values
    fn snapshot(&self) -> SearchState;
}

/// Process-wide search state store
#[derive(Debug, Default)]
pub struct SharedSearchState {
    state: RwLock<SearchState>,
}

impl SharedSearchState {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given values
    #[must_use]
    pub fn with_state(state: SearchState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Apply an arbitrary update under the write lock
    pub fn update(&self, f: impl FnOnce(&mut SearchState)) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    /// Replace every value at once
    pub fn replace(&self, state: SearchState) {
        self.update(|s| *s = state);
    }

    /// Clear every value
    pub fn reset(&self) {
        self.replace(SearchState::default());
    }

    /// Set or clear the keyword
    pub fn set_search(&self, search: Option<String>) {
        self.update(|s| s.search = search);
    }

    /// Set or clear the page number
    pub fn set_page_number(&self, page_number: Option<u32>) {
        self.update(|s| s.page_number = page_number);
    }

    /// Set or clear the page size
    pub fn set_page_limit(&self, page_limit: Option<u32>) {
        self.update(|s| s.page_limit = page_limit);
    }

    /// Set or clear the filter
    pub fn set_filter(&self, filter: Option<String>) {
        self.update(|s| s.filter = filter);
    }

    /// Set or clear the sort
    pub fn set_sort(&self, sort: Option<String>) {
        self.update(|s| s.sort = sort);
    }

    /// Set or clear the include list
    pub fn set_include(&self, include: Option<String>) {
        self.update(|s| s.include = include);
    }
}

impl SearchStateProvider for SharedSearchState {
    fn snapshot(&self) -> SearchState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
