// ABOUTME: Shared test utilities and in-process fakes for integration tests
// ABOUTME: Scripted transport, event-logging collaborators and orchestrator setup helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `recruit_query`
//!
//! Collaborators append to one [`EventLog`] so tests can assert the order in
//! which side effects happened.

use async_trait::async_trait;
use recruit_query::cache::memory::InMemoryQueryCache;
use recruit_query::cache::{CacheClient, CacheKey, CachedResult};
use recruit_query::config::QueryConfig;
use recruit_query::envelope::ResponseEnvelope;
use recruit_query::errors::AppResult;
use recruit_query::navigation::Navigator;
use recruit_query::notifications::{Alert, AlertKind, AlertSink};
use recruit_query::orchestrator::RequestOrchestrator;
use recruit_query::search_state::SharedSearchState;
use recruit_query::transport::{ApiRequest, ApiResponse, HttpTransport};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Ordered record of side effects
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

/// Transport returning scripted responses, then a default envelope
pub struct FakeTransport {
    scripted: Mutex<VecDeque<AppResult<ApiResponse>>>,
    default_envelope: Mutex<ResponseEnvelope>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default_envelope: Mutex::new(ResponseEnvelope::ok(json!({"ok": true}))),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Every response waits `delay` before resolving
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new()
        }
    }

    /// Envelope returned once the script runs out
    pub fn set_default(&self, envelope: ResponseEnvelope) {
        *self.default_envelope.lock().unwrap() = envelope;
    }

    /// Queue a successful 200 response
    pub fn push_ok(&self, envelope: ResponseEnvelope) {
        self.push_result(Ok(ApiResponse {
            status: 200,
            envelope,
        }));
    }

    /// Queue a raw result
    pub fn push_result(&self, result: AppResult<ApiResponse>) {
        self.scripted.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.scripted.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(ApiResponse {
                status: 200,
                envelope: self.default_envelope.lock().unwrap().clone(),
            })
        })
    }
}

/// Alert sink that records alerts and logs them
#[derive(Default)]
pub struct RecordingAlerts {
    log: EventLog,
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingAlerts {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn of_kind(&self, kind: AlertKind) -> Vec<Alert> {
        self.alerts()
            .into_iter()
            .filter(|a| a.kind == kind)
            .collect()
    }
}

impl AlertSink for RecordingAlerts {
    fn add_alert(&self, alert: Alert) {
        self.log.push(format!("alert:{:?}", alert.kind).to_lowercase());
        self.alerts.lock().unwrap().push(alert);
    }
}

/// Navigator that logs redirects
pub struct RecordingNavigator {
    log: EventLog,
}

impl RecordingNavigator {
    pub const fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        self.log.push(format!("redirect:{path}"));
    }
}

/// In-memory cache that logs invalidations
pub struct RecordingCache {
    log: EventLog,
    inner: InMemoryQueryCache,
}

impl RecordingCache {
    pub fn new(log: EventLog, stale_time: Duration) -> Self {
        Self {
            log,
            inner: InMemoryQueryCache::new(100, stale_time),
        }
    }
}

#[async_trait]
impl CacheClient for RecordingCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedResult> {
        self.inner.get(key).await
    }

    async fn set(&self, key: CacheKey, value: ResponseEnvelope) {
        self.inner.set(key, value).await;
    }

    async fn invalidate(&self, keys: &[CacheKey]) -> usize {
        let names: Vec<String> = keys.iter().map(ToString::to_string).collect();
        self.log.push(format!("invalidate:{}", names.join(",")));
        self.inner.invalidate(keys).await
    }

    async fn clear_all(&self) {
        self.inner.clear_all().await;
    }
}

/// Everything a test needs to drive and inspect an orchestrator
pub struct Harness {
    pub orchestrator: RequestOrchestrator,
    pub transport: Arc<FakeTransport>,
    pub search_state: Arc<SharedSearchState>,
    pub alerts: Arc<RecordingAlerts>,
    pub log: EventLog,
}

/// Orchestrator over fakes; reads retry `retry_count` times with no delay
pub fn harness_with(transport: FakeTransport, stale_time: Duration, retry_count: u32) -> Harness {
    init_test_logging();
    let log = EventLog::default();
    let transport = Arc::new(transport);
    let search_state = Arc::new(SharedSearchState::new());
    let alerts = Arc::new(RecordingAlerts::new(log.clone()));

    let query = QueryConfig {
        retry_delay: Duration::ZERO,
        ..QueryConfig::new(stale_time, retry_count)
    };
    let orchestrator = RequestOrchestrator::builder()
        .transport(transport.clone())
        .cache(Arc::new(RecordingCache::new(log.clone(), stale_time)))
        .search_state(search_state.clone())
        .alerts(alerts.clone())
        .navigator(Arc::new(RecordingNavigator::new(log.clone())))
        .query_config(query)
        .build()
        .unwrap();

    Harness {
        orchestrator,
        transport,
        search_state,
        alerts,
        log,
    }
}

/// Orchestrator with a five-minute staleness window and no read retries
pub fn harness() -> Harness {
    harness_with(FakeTransport::new(), Duration::from_secs(300), 0)
}

/// Value of a query pair on a recorded request
pub fn query_value(request: &ApiRequest, name: &str) -> Option<String> {
    request
        .query
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.clone())
}

/// Envelope with a list payload and page metadata
pub fn list_envelope(items: Value) -> ResponseEnvelope {
    serde_json::from_value(json!({
        "success": true,
        "payload": items,
        "metadata": {"page": 1, "pages": 1, "totalCount": 1, "prevPage": null, "nextPage": null}
    }))
    .unwrap()
}
