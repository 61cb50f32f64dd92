// ABOUTME: Watched reads that keep emitting fresh results as the cache changes
// ABOUTME: Refetches on an interval, on invalidation of the watched key, and on focus
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{QueryResult, QueryState, ReadConfig, RequestOrchestrator};
use crate::cache::CacheKey;
use futures_util::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

enum WatchState {
    Initial,
    Fetching,
    Waiting {
        invalidations: broadcast::Receiver<Vec<CacheKey>>,
        focus: broadcast::Receiver<()>,
    },
}

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Interval,
    Invalidated,
    Focus,
}

impl RequestOrchestrator {
    /// Watch a read
    ///
    /// Emits the cached result immediately when there is one (`Loading`
    /// otherwise), fetches if that result is missing or stale, then refetches
    /// whenever the interval elapses, a mutation invalidates the watched key,
    /// or [`notify_focus`](Self::notify_focus) is called with refetch-on-focus
    /// enabled. Each fetch re-reads the shared search state.
    #[must_use]
    pub fn watch(&self, config: ReadConfig) -> BoxStream<'static, QueryResult> {
        let orchestrator = self.clone();
        let config = Arc::new(config);

        stream::unfold(WatchState::Initial, move |state| {
            let orchestrator = orchestrator.clone();
            let config = Arc::clone(&config);

            async move {
                match state {
                    WatchState::Initial => {
                        let key = orchestrator.current_key(&config);
                        match orchestrator.cache.get(&key).await {
                            Some(hit) if !hit.is_stale => {
                                let result = QueryResult {
                                    state: QueryState::Success {
                                        envelope: hit.envelope,
                                        is_stale: false,
                                    },
                                };
                                Some((result, orchestrator.waiting()))
                            }
                            Some(hit) => {
                                let result = QueryResult {
                                    state: QueryState::Success {
                                        envelope: hit.envelope,
                                        is_stale: true,
                                    },
                                };
                                Some((result, WatchState::Fetching))
                            }
                            None => Some((QueryResult::loading(), WatchState::Fetching)),
                        }
                    }

                    WatchState::Fetching => {
                        // Subscribe first so an invalidation during the fetch is not lost
                        let next = orchestrator.waiting();
                        let result = orchestrator.load(&config, None, true).await;
                        Some((QueryResult::from_result(result), next))
                    }

                    WatchState::Waiting {
                        mut invalidations,
                        mut focus,
                    } => {
                        let trigger = orchestrator
                            .next_trigger(&config, &mut invalidations, &mut focus)
                            .await?;
                        debug!(?trigger, cache.key = %config.cache_key, "Refetching watched read");
                        let result = orchestrator.load(&config, None, true).await;
                        Some((
                            QueryResult::from_result(result),
                            WatchState::Waiting {
                                invalidations,
                                focus,
                            },
                        ))
                    }
                }
            }
        })
        .boxed()
    }

    fn waiting(&self) -> WatchState {
        WatchState::Waiting {
            invalidations: self.invalidations.subscribe(),
            focus: self.focus.subscribe(),
        }
    }

    /// Wait for the next reason to refetch; `None` once the orchestrator is gone
    async fn next_trigger(
        &self,
        config: &ReadConfig,
        invalidations: &mut broadcast::Receiver<Vec<CacheKey>>,
        focus: &mut broadcast::Receiver<()>,
    ) -> Option<Trigger> {
        let on_focus = config
            .refetch_on_focus
            .unwrap_or(self.query.refetch_on_focus);
        let interval = wait_interval(config.refetch_interval);
        tokio::pin!(interval);

        loop {
            tokio::select! {
                () = &mut interval => return Some(Trigger::Interval),
                received = invalidations.recv() => match received {
                    Ok(keys) if covers(&config.cache_key, &keys) => {
                        return Some(Trigger::Invalidated);
                    }
                    Ok(_) => {}
                    // Missed messages may have named this key
                    Err(RecvError::Lagged(_)) => return Some(Trigger::Invalidated),
                    Err(RecvError::Closed) => return None,
                },
                received = focus.recv(), if on_focus => match received {
                    Ok(()) | Err(RecvError::Lagged(_)) => return Some(Trigger::Focus),
                    Err(RecvError::Closed) => return None,
                },
            }
        }
    }
}

/// Whether invalidating `keys` affects the watched key
fn covers(watched: &CacheKey, keys: &[CacheKey]) -> bool {
    keys.iter()
        .any(|key| watched.starts_with(key) || key.starts_with(watched))
}

async fn wait_interval(interval: Option<Duration>) {
    match interval {
        Some(period) => tokio::time::sleep(period).await,
        None => std::future::pending().await,
    }
}
