// ABOUTME: Resolves READ query parameters from explicit overrides and shared search state
// ABOUTME: Composes filters with a pipe separator and strips empty values before transmission
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query parameter resolution
//!
//! Each of the six query fields takes the explicit override when it is present
//! and non-empty, otherwise the value held in the shared search state at call
//! time. The filter is the exception: explicit and shared filters are both
//! applied, joined with `|`.

use crate::constants::query_params;
use crate::search_state::SearchState;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Explicit per-read overrides; `None` defers to the shared search state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefaults {
    /// Keyword override
    pub keyword: Option<String>,
    /// Page number override
    pub page_number: Option<u32>,
    /// Page size override
    pub page_limit: Option<u32>,
    /// Filter composed with the shared filter
    pub filter: Option<String>,
    /// Sort override
    pub sort: Option<String>,
    /// Include override
    pub include: Option<String>,
}

impl QueryDefaults {
    /// Override the keyword
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Override the page number
    #[must_use]
    pub const fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Override the page size
    #[must_use]
    pub const fn page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = Some(page_limit);
        self
    }

    /// Add a filter applied together with the shared filter
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Override the sort
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Override the include list
    #[must_use]
    pub fn include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Resolve against a search state snapshot taken at call time
    #[must_use]
    pub fn resolve(&self, shared: &SearchState) -> ResolvedQuery {
        ResolvedQuery {
            keyword: pick(self.keyword.as_deref(), shared.search.as_deref()),
            page_number: self.page_number.or(shared.page_number),
            page_limit: self.page_limit.or(shared.page_limit),
            filter: compose_filters(self.filter.as_deref(), shared.filter.as_deref()),
            sort: pick(self.sort.as_deref(), shared.sort.as_deref()),
            include: pick(self.include.as_deref(), shared.include.as_deref()),
        }
    }
}

/// Effective parameters for one READ, with empty values already removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResolvedQuery {
    /// Keyword
    pub keyword: Option<String>,
    /// Page number
    pub page_number: Option<u32>,
    /// Page size
    pub page_limit: Option<u32>,
    /// Composed filter
    pub filter: Option<String>,
    /// Sort
    pub sort: Option<String>,
    /// Include list
    pub include: Option<String>,
}

impl ResolvedQuery {
    /// Query-string pairs in wire order; absent fields are omitted
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(6);
        if let Some(keyword) = &self.keyword {
            pairs.push((query_params::KEYWORD, keyword.clone()));
        }
        if let Some(page) = self.page_number {
            pairs.push((query_params::PAGE_NUMBER, page.to_string()));
        }
        if let Some(limit) = self.page_limit {
            pairs.push((query_params::PAGE_LIMIT, limit.to_string()));
        }
        if let Some(filter) = &self.filter {
            pairs.push((query_params::FILTER_OPTIONS, filter.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push((query_params::SORT_OPTIONS, sort.clone()));
        }
        if let Some(include) = &self.include {
            pairs.push((query_params::INCLUDE_OPTIONS, include.clone()));
        }
        pairs
    }

    /// Stable string form used to tell cache entries for different parameters apart
    ///
    /// Values are form-encoded so free text containing `&` or `=` cannot
    /// collide with another parameter set.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }

    /// True when no parameter will be sent
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.page_number.is_none()
            && self.page_limit.is_none()
            && self.filter.is_none()
            && self.sort.is_none()
            && self.include.is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn pick(explicit: Option<&str>, shared: Option<&str>) -> Option<String> {
    non_empty(explicit).or_else(|| non_empty(shared)).map(str::to_owned)
}

fn compose_filters(explicit: Option<&str>, shared: Option<&str>) -> Option<String> {
    match (non_empty(explicit), non_empty(shared)) {
        (Some(explicit), Some(shared)) => Some(format!(
            "{explicit}{}{shared}",
            query_params::FILTER_SEPARATOR
        )),
        (Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
        (None, None) => None,
    }
}
