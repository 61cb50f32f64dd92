// ABOUTME: Request orchestrator dispatching one HTTP operation per invocation
// ABOUTME: Resolves read parameters, decrypts payloads, and runs mutation side effects in order
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Request Orchestrator
//!
//! Turns a declarative [`Operation`] into exactly one network call.
//!
//! - **READ**: parameters are resolved from explicit overrides and the shared
//!   search state snapshot taken at call time, the result is served through the
//!   injected cache, and a string payload is decrypted and parsed as JSON.
//!   Failed reads are retried up to the configured count.
//! - **CREATE / UPDATE / DELETE**: never retried and never decrypted. On
//!   success the side effects run in a fixed order: success alert, cache
//!   invalidation, redirect, `on_success`. On failure exactly one error alert is
//!   raised (the server's message when it sent one), then `on_error` runs.
//!
//! Every invocation accepts an optional [`CancellationToken`]. A cancelled
//! invocation returns a `Cancelled` error, caches nothing and raises no alert.
//!
//! ```rust,no_run
//! use recruit_query::config::ClientConfig;
//! use recruit_query::orchestrator::{MutationConfig, MutationInput, Operation, ReadConfig, RequestOrchestrator};
//! use serde_json::json;
//! # async fn example() -> recruit_query::errors::AppResult<()> {
//!
//! let orchestrator = RequestOrchestrator::from_config(&ClientConfig::from_env()?)?;
//!
//! let athletes = orchestrator
//!     .read(&ReadConfig::new("/athletes", "athletes"), None)
//!     .await?;
//!
//! let create = Operation::Create(
//!     MutationConfig::for_resource("/athletes")
//!         .success_message("Athlete created")
//!         .invalidate("athletes")
//!         .redirect_to("/athletes"),
//! );
//! orchestrator
//!     .execute(&create, MutationInput::with_body(json!({"name": "Sam"})), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

/// Single-use invocation handle with observable state
pub mod invocation;
/// Operation enum and per-verb configuration
pub mod operation;
/// Request and watched-read states
pub mod state;
mod watch;

pub use invocation::Invocation;
pub use operation::{
    ErrorCallback, MutationConfig, MutationInput, Operation, ReadConfig, SideEffects,
    SuccessCallback,
};
pub use state::{QueryResult, QueryState, RequestState};

use crate::cache::memory::InMemoryQueryCache;
use crate::cache::{CacheClient, CacheKey};
use crate::config::{ClientConfig, QueryConfig};
use crate::constants::{alerts, cache, env_config};
use crate::crypto::CryptoContext;
use crate::envelope::ResponseEnvelope;
use crate::errors::{AppError, AppResult};
use crate::navigation::{HistoryNavigator, Navigator};
use crate::notifications::{Alert, AlertQueue, AlertSink};
use crate::query::ResolvedQuery;
use crate::search_state::{SearchStateProvider, SharedSearchState};
use crate::transport::{ApiRequest, HttpTransport, Method, ReqwestTransport};
use arc_swap::ArcSwapOption;
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Executes operations against injected collaborators
#[derive(Clone)]
pub struct RequestOrchestrator {
    transport: Arc<dyn HttpTransport>,
    cache: Arc<dyn CacheClient>,
    search_state: Arc<dyn SearchStateProvider>,
    crypto: Arc<ArcSwapOption<CryptoContext>>,
    alerts: Arc<dyn AlertSink>,
    navigator: Arc<dyn Navigator>,
    query: QueryConfig,
    alert_duration: Duration,
    invalidations: broadcast::Sender<Vec<CacheKey>>,
    focus: broadcast::Sender<()>,
}

impl RequestOrchestrator {
    /// Start building an orchestrator
    #[must_use]
    pub fn builder() -> RequestOrchestratorBuilder {
        RequestOrchestratorBuilder::default()
    }

    /// Orchestrator wired to the real network, an in-memory cache and fresh
    /// search state, alert and navigation stores
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the base URL or payload key is malformed
    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::configured(config)?.build()
    }

    /// Builder pre-wired like [`Self::from_config`], for callers that swap in
    /// their own collaborators before building
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the base URL or payload key is malformed
    pub fn configured(config: &ClientConfig) -> AppResult<RequestOrchestratorBuilder> {
        let mut builder = Self::builder()
            .transport(Arc::new(ReqwestTransport::new(&config.http)?))
            .cache(Arc::new(InMemoryQueryCache::from_config(config)))
            .query_config(config.query.clone())
            .alert_duration(config.alert_duration);
        if let Some(key) = &config.payload_key {
            builder = builder.crypto(CryptoContext::from_base64(key)?);
        }
        Ok(builder)
    }

    /// Run any operation; `input` is ignored for reads
    ///
    /// # Errors
    ///
    /// Returns the failure of the underlying read or mutation
    pub async fn execute(
        &self,
        operation: &Operation,
        input: MutationInput,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        match operation {
            Operation::Read(config) => self.read(config, cancel).await,
            Operation::Create(config) => self.mutate(Method::Create, config, input, cancel).await,
            Operation::Update(config) => self.mutate(Method::Update, config, input, cancel).await,
            Operation::Delete(config) => self.mutate(Method::Delete, config, input, cancel).await,
        }
    }

    /// Wrap an operation in a single-use handle whose state can be observed
    #[must_use]
    pub fn invoke(&self, operation: Operation) -> Invocation {
        Invocation::new(self.clone(), operation)
    }

    /// Fetch through the cache: a fresh entry is returned as is, otherwise
    /// the resource is requested and the result stored
    ///
    /// # Errors
    ///
    /// Transport, server, decryption and cancellation errors
    pub async fn read(
        &self,
        config: &ReadConfig,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        self.load(config, cancel, false).await
    }

    /// CREATE
    ///
    /// # Errors
    ///
    /// Transport, server, missing-resource and cancellation errors
    pub async fn create(
        &self,
        config: &MutationConfig,
        input: MutationInput,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        self.mutate(Method::Create, config, input, cancel).await
    }

    /// UPDATE
    ///
    /// # Errors
    ///
    /// Transport, server, missing-resource and cancellation errors
    pub async fn update(
        &self,
        config: &MutationConfig,
        input: MutationInput,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        self.mutate(Method::Update, config, input, cancel).await
    }

    /// DELETE; the body travels in the request body
    ///
    /// # Errors
    ///
    /// Transport, server, missing-resource and cancellation errors
    pub async fn delete(
        &self,
        config: &MutationConfig,
        input: MutationInput,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        self.mutate(Method::Delete, config, input, cancel).await
    }

    /// Mark every cached entry under `keys` stale and wake watched reads.
    /// Returns the number of entries affected.
    pub async fn invalidate(&self, keys: &[CacheKey]) -> usize {
        let affected = self.cache.invalidate(keys).await;
        // Err only means nothing is being watched
        let _ = self.invalidations.send(keys.to_vec());
        affected
    }

    /// Tell watched reads the application regained focus
    pub fn notify_focus(&self) {
        let _ = self.focus.send(());
    }

    /// Swap the payload key; `None` disables decryption
    pub fn rotate_crypto(&self, crypto: Option<CryptoContext>) {
        info!(enabled = crypto.is_some(), "Payload key rotated");
        self.crypto.store(crypto.map(Arc::new));
    }

    /// Injected search state
    #[must_use]
    pub fn search_state(&self) -> &Arc<dyn SearchStateProvider> {
        &self.search_state
    }

    /// Injected cache
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheClient> {
        &self.cache
    }

    /// Read-query settings
    #[must_use]
    pub const fn query_config(&self) -> &QueryConfig {
        &self.query
    }

    /// Cache entry key for a read: the configured key plus the resolved parameters
    pub(crate) fn entry_key(cache_key: &CacheKey, resolved: &ResolvedQuery) -> CacheKey {
        if resolved.is_empty() {
            cache_key.clone()
        } else {
            cache_key.clone().with_segment(resolved.fingerprint())
        }
    }

    /// Entry key for a read against the current search state
    pub(crate) fn current_key(&self, config: &ReadConfig) -> CacheKey {
        let resolved = config.defaults.resolve(&self.search_state.snapshot());
        Self::entry_key(&config.cache_key, &resolved)
    }

    /// Read, optionally bypassing a fresh cache entry
    pub(crate) async fn load(
        &self,
        config: &ReadConfig,
        cancel: Option<&CancellationToken>,
        force: bool,
    ) -> AppResult<ResponseEnvelope> {
        let request_id = Uuid::new_v4().to_string();
        let resolved = config.defaults.resolve(&self.search_state.snapshot());
        let key = Self::entry_key(&config.cache_key, &resolved);
        let span = info_span!(
            "read",
            request.id = %request_id,
            http.url = %config.resource,
            cache.key = %key
        );

        async {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(AppError::cancelled().with_request_id(&request_id));
            }

            let request = ApiRequest::read(
                config.resource.clone(),
                resolved.to_pairs(),
                request_id.clone(),
            );
            let fetcher: BoxFuture<'_, AppResult<ResponseEnvelope>> =
                Box::pin(self.fetch_read(request, cancel));

            let result = if force {
                let fetched = fetcher.await;
                if let Ok(envelope) = &fetched {
                    self.cache.set(key, envelope.clone()).await;
                }
                fetched
            } else {
                self.cache.fetch(key, fetcher).await
            };

            match &result {
                Ok(_) => debug!("Read settled"),
                Err(error) if error.is_cancelled() => debug!("Read cancelled"),
                Err(error) => {
                    warn!(error = %error, "Read failed");
                    if config.alert_on_error {
                        self.alert_error(error);
                    }
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Request a read, retrying retryable failures, then decrypt the payload
    async fn fetch_read(
        &self,
        request: ApiRequest,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        let mut attempt = 0;
        loop {
            match self.send(request.clone(), cancel).await {
                Ok(envelope) => return self.decrypt_payload(envelope, &request.request_id),
                Err(error) if error.is_retryable() && attempt < self.query.retry_count => {
                    attempt += 1;
                    warn!(attempt, error = %error, "Read failed, retrying");
                    until_cancelled(cancel, async {
                        tokio::time::sleep(self.query.retry_delay).await;
                        Ok(())
                    })
                    .await?;
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Replace a ciphertext payload with its decrypted JSON
    fn decrypt_payload(
        &self,
        mut envelope: ResponseEnvelope,
        request_id: &str,
    ) -> AppResult<ResponseEnvelope> {
        if let Value::String(ciphertext) = &envelope.payload {
            let crypto = self.crypto.load_full().ok_or_else(|| {
                AppError::config_missing(env_config::PAYLOAD_KEY).with_request_id(request_id)
            })?;
            let payload = crypto
                .decrypt_json(ciphertext)
                .map_err(|e| e.with_request_id(request_id))?;
            envelope.payload = payload;
            debug!("Decrypted response payload");
        }
        Ok(envelope)
    }

    /// One transport call; a 2xx envelope reporting `success: false` is a rejection
    async fn send(
        &self,
        request: ApiRequest,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        let request_id = request.request_id.clone();
        let response = until_cancelled(cancel, self.transport.send(request)).await?;
        if !response.envelope.success {
            return Err(
                AppError::server_rejected(response.status, response.envelope.message)
                    .with_request_id(request_id),
            );
        }
        Ok(response.envelope)
    }

    async fn mutate(
        &self,
        method: Method,
        config: &MutationConfig,
        input: MutationInput,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("mutate", http.method = %method, request.id = %request_id);

        async {
            let result = self
                .send_mutation(method, config, input, &request_id, cancel)
                .await;
            match result {
                Ok(envelope) => {
                    info!("Mutation succeeded");
                    self.apply_success_effects(config, &envelope).await;
                    Ok(envelope)
                }
                Err(error) if error.is_cancelled() => {
                    debug!("Mutation cancelled");
                    Err(error)
                }
                Err(error) => {
                    warn!(error = %error, "Mutation failed");
                    self.alert_error(&error);
                    if let Some(on_error) = &config.side_effects.on_error {
                        on_error(&error);
                    }
                    Err(error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn send_mutation(
        &self,
        method: Method,
        config: &MutationConfig,
        input: MutationInput,
        request_id: &str,
        cancel: Option<&CancellationToken>,
    ) -> AppResult<ResponseEnvelope> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(AppError::cancelled().with_request_id(request_id));
        }
        let resource = input
            .resource
            .filter(|r| !r.trim().is_empty())
            .or_else(|| config.resource.clone())
            .ok_or_else(|| AppError::missing_resource().with_request_id(request_id))?;

        let request = ApiRequest::mutation(method, resource, input.body, request_id);
        self.send(request, cancel).await
    }

    /// Success alert, then invalidation, then redirect, then `on_success`
    async fn apply_success_effects(&self, config: &MutationConfig, envelope: &ResponseEnvelope) {
        let effects = &config.side_effects;
        if let Some(message) = &effects.success_message {
            self.alerts
                .add_alert(Alert::success(message.clone()).with_duration(self.alert_duration));
        }
        if !config.invalidate_on_success.is_empty() {
            self.invalidate(&config.invalidate_on_success).await;
        }
        if let Some(path) = &effects.redirect_to {
            self.navigator.push(path);
        }
        if let Some(on_success) = &effects.on_success {
            on_success(envelope);
        }
    }

    fn alert_error(&self, error: &AppError) {
        self.alerts
            .add_alert(Alert::error(error.alert_message()).with_duration(self.alert_duration));
    }
}

/// Race `future` against the token; cancellation wins ties
async fn until_cancelled<T: Send>(
    cancel: Option<&CancellationToken>,
    future: impl Future<Output = AppResult<T>> + Send,
) -> AppResult<T> {
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(AppError::cancelled()),
                result = future => result,
            }
        }
        None => future.await,
    }
}

/// Builder for [`RequestOrchestrator`]; only the transport is required
pub struct RequestOrchestratorBuilder {
    transport: Option<Arc<dyn HttpTransport>>,
    cache: Option<Arc<dyn CacheClient>>,
    search_state: Option<Arc<dyn SearchStateProvider>>,
    crypto: Option<CryptoContext>,
    alerts: Option<Arc<dyn AlertSink>>,
    navigator: Option<Arc<dyn Navigator>>,
    query: QueryConfig,
    alert_duration: Duration,
}

impl Default for RequestOrchestratorBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            cache: None,
            search_state: None,
            crypto: None,
            alerts: None,
            navigator: None,
            query: QueryConfig::default(),
            alert_duration: Duration::from_millis(alerts::DEFAULT_ALERT_DURATION_MS),
        }
    }
}

impl RequestOrchestratorBuilder {
    /// Transport used for every request
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Query cache; defaults to an in-memory LRU cache
    #[must_use]
    pub fn cache(mut self, cache: Arc<dyn CacheClient>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Shared search state; defaults to an empty store
    #[must_use]
    pub fn search_state(mut self, search_state: Arc<dyn SearchStateProvider>) -> Self {
        self.search_state = Some(search_state);
        self
    }

    /// Payload key used to decrypt read payloads
    #[must_use]
    pub fn crypto(mut self, crypto: CryptoContext) -> Self {
        self.crypto = Some(crypto);
        self
    }

    /// Alert destination; defaults to an [`AlertQueue`] nobody drains
    #[must_use]
    pub fn alerts(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Redirect target; defaults to a [`HistoryNavigator`]
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Read retry and staleness settings
    #[must_use]
    pub fn query_config(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    /// How long alerts stay visible
    #[must_use]
    pub const fn alert_duration(mut self, duration: Duration) -> Self {
        self.alert_duration = duration;
        self
    }

    /// Assemble the orchestrator
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when no transport was supplied
    pub fn build(self) -> AppResult<RequestOrchestrator> {
        let transport = self
            .transport
            .ok_or_else(|| AppError::config_missing("HTTP transport"))?;
        let stale_time = self.query.stale_time;
        let (invalidations, _) = broadcast::channel(cache::BROADCAST_CAPACITY);
        let (focus, _) = broadcast::channel(cache::BROADCAST_CAPACITY);

        Ok(RequestOrchestrator {
            transport,
            cache: self.cache.unwrap_or_else(|| {
                Arc::new(InMemoryQueryCache::new(
                    cache::DEFAULT_CACHE_MAX_ENTRIES,
                    stale_time,
                ))
            }),
            search_state: self
                .search_state
                .unwrap_or_else(|| Arc::new(SharedSearchState::new())),
            crypto: Arc::new(ArcSwapOption::new(self.crypto.map(Arc::new))),
            alerts: self.alerts.unwrap_or_else(|| Arc::new(AlertQueue::new())),
            navigator: self
                .navigator
                .unwrap_or_else(|| Arc::new(HistoryNavigator::new())),
            query: self.query,
            alert_duration: self.alert_duration,
            invalidations,
            focus,
        })
    }
}
