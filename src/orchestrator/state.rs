// ABOUTME: Request lifecycle states exposed to callers of the orchestrator
// ABOUTME: Per-invocation idle/pending/success/error and the watched-read result type
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::envelope::ResponseEnvelope;
use crate::errors::{AppError, AppResult};

/// Lifecycle of one invocation: `Idle -> Pending -> Success | Error`
#[derive(Debug, Clone)]
pub enum RequestState<T = ResponseEnvelope> {
    /// Not started
    Idle,
    /// In flight
    Pending,
    /// Settled with data
    Success(T),
    /// Settled with an error
    Error(AppError),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> RequestState<T> {
    /// Settled state for a finished invocation
    pub fn settled(result: AppResult<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Error(error),
        }
    }

    /// Data, when settled successfully
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Error, when settled with one
    pub const fn error(&self) -> Option<&AppError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Not started
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// In flight
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Settled successfully
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Settled with an error
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Success and error are terminal
    pub const fn is_settled(&self) -> bool {
        self.is_success() || self.is_error()
    }
}

/// State of a watched read
#[derive(Debug, Clone)]
pub enum QueryState {
    /// First fetch in flight, nothing cached yet
    Loading,
    /// Data available; `is_stale` means a refetch follows
    Success {
        /// Decoded envelope
        envelope: ResponseEnvelope,
        /// Served from an outdated cache entry
        is_stale: bool,
    },
    /// Last fetch failed
    Error(AppError),
}

/// One emission of a watched read
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Current state
    pub state: QueryState,
}

impl QueryResult {
    pub(crate) const fn loading() -> Self {
        Self {
            state: QueryState::Loading,
        }
    }

    pub(crate) fn from_result(result: AppResult<ResponseEnvelope>) -> Self {
        let state = match result {
            Ok(envelope) => QueryState::Success {
                envelope,
                is_stale: false,
            },
            Err(error) => QueryState::Error(error),
        };
        Self { state }
    }

    /// Envelope, when available
    pub const fn data(&self) -> Option<&ResponseEnvelope> {
        match &self.state {
            QueryState::Success { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// Error, when the last fetch failed
    pub const fn error(&self) -> Option<&AppError> {
        match &self.state {
            QueryState::Error(error) => Some(error),
            _ => None,
        }
    }

    /// First fetch in flight
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, QueryState::Loading)
    }

    /// Data available
    pub const fn is_success(&self) -> bool {
        matches!(self.state, QueryState::Success { .. })
    }

    /// Last fetch failed
    pub const fn is_error(&self) -> bool {
        matches!(self.state, QueryState::Error(_))
    }

    /// Data came from an outdated cache entry
    pub const fn is_stale(&self) -> bool {
        matches!(self.state, QueryState::Success { is_stale: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_state_predicates() {
        let idle: RequestState = RequestState::default();
        assert!(idle.is_idle() && !idle.is_settled());

        let ok = RequestState::settled(Ok(ResponseEnvelope::ok(json!(1))));
        assert!(ok.is_success() && ok.is_settled());
        assert_eq!(ok.data().unwrap().payload, json!(1));

        let err: RequestState = RequestState::settled(Err(AppError::timeout("slow")));
        assert!(err.is_error());
        assert!(err.data().is_none());
        assert!(err.error().is_some());
    }

    #[test]
    fn test_query_result_predicates() {
        assert!(QueryResult::loading().is_loading());

        let ok = QueryResult::from_result(Ok(ResponseEnvelope::ok(json!([]))));
        assert!(ok.is_success() && !ok.is_stale());

        let stale = QueryResult {
            state: QueryState::Success {
                envelope: ResponseEnvelope::ok(json!([])),
                is_stale: true,
            },
        };
        assert!(stale.is_stale());

        let err = QueryResult::from_result(Err(AppError::transport("down")));
        assert!(err.is_error());
        assert!(err.data().is_none());
    }
}
