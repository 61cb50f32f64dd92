// ABOUTME: Single-use invocation handle exposing idle/pending/success/error state
// ABOUTME: Owns a cancellation token so the caller can abandon the request mid-flight
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{MutationInput, Operation, RequestOrchestrator, RequestState};
use crate::envelope::ResponseEnvelope;
use crate::errors::{AppError, AppResult};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// One run of an operation
///
/// Starts `Idle`, moves to `Pending` when [`run`](Self::run) is called and
/// settles in `Success` or `Error`. A second `run` is rejected.
pub struct Invocation {
    orchestrator: RequestOrchestrator,
    operation: Operation,
    cancel: CancellationToken,
    state: watch::Sender<RequestState>,
}

impl Invocation {
    pub(crate) fn new(orchestrator: RequestOrchestrator, operation: Operation) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            orchestrator,
            operation,
            cancel: CancellationToken::new(),
            state,
        }
    }

    /// Operation this invocation runs
    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Receive every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// Abandon the request; `run` resolves to `Cancelled`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the in-flight request
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute the operation once
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if this invocation already ran, otherwise the
    /// operation's own failure
    pub async fn run(&self, input: MutationInput) -> AppResult<ResponseEnvelope> {
        let started = self.state.send_if_modified(|state| {
            if state.is_idle() {
                *state = RequestState::Pending;
                true
            } else {
                false
            }
        });
        if !started {
            return Err(AppError::invalid_input("Invocation has already been run"));
        }

        let result = self
            .orchestrator
            .execute(&self.operation, input, Some(&self.cancel))
            .await;
        self.state.send_replace(RequestState::settled(result.clone()));
        result
    }
}
