// ABOUTME: Declarative request configuration: the operation enum and its per-verb settings
// ABOUTME: Read settings carry query defaults and cache key; mutations carry invalidations and side effects
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::cache::CacheKey;
use crate::envelope::ResponseEnvelope;
use crate::errors::AppError;
use crate::query::QueryDefaults;
use crate::transport::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Callback run with the response of a successful mutation
pub type SuccessCallback = Arc<dyn Fn(&ResponseEnvelope) + Send + Sync>;

/// Callback run with the error of a failed mutation
pub type ErrorCallback = Arc<dyn Fn(&AppError) + Send + Sync>;

/// One request the orchestrator knows how to run
#[derive(Debug, Clone)]
pub enum Operation {
    /// GET with resolved query parameters, served through the cache
    Read(ReadConfig),
    /// POST
    Create(MutationConfig),
    /// PUT
    Update(MutationConfig),
    /// DELETE with the body in the request body
    Delete(MutationConfig),
}

impl Operation {
    /// Transport verb for this operation
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::Read(_) => Method::Read,
            Self::Create(_) => Method::Create,
            Self::Update(_) => Method::Update,
            Self::Delete(_) => Method::Delete,
        }
    }

    /// Resource configured up front, if any
    #[must_use]
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::Read(config) => Some(config.resource.as_str()),
            Self::Create(config) | Self::Update(config) | Self::Delete(config) => {
                config.resource.as_deref()
            }
        }
    }
}

/// READ settings
#[derive(Debug, Clone)]
pub struct ReadConfig {
    /// Path or URL to fetch
    pub resource: String,
    /// Key the result is cached under; the resolved parameters are appended
    pub cache_key: CacheKey,
    /// Explicit overrides of the shared search state
    pub defaults: QueryDefaults,
    /// Background refresh interval for watched reads
    pub refetch_interval: Option<Duration>,
    /// Refetch watched reads on focus; `None` uses the client default
    pub refetch_on_focus: Option<bool>,
    /// Raise an error alert when the read fails
    pub alert_on_error: bool,
}

impl ReadConfig {
    /// Read `resource`, caching under `cache_key`
    #[must_use]
    pub fn new(resource: impl Into<String>, cache_key: impl Into<CacheKey>) -> Self {
        Self {
            resource: resource.into(),
            cache_key: cache_key.into(),
            defaults: QueryDefaults::default(),
            refetch_interval: None,
            refetch_on_focus: None,
            alert_on_error: false,
        }
    }

    /// Set explicit query overrides
    #[must_use]
    pub fn defaults(mut self, defaults: QueryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Refresh a watched read on this interval
    #[must_use]
    pub const fn refetch_interval(mut self, interval: Duration) -> Self {
        self.refetch_interval = Some(interval);
        self
    }

    /// Enable or disable refetch on focus
    #[must_use]
    pub const fn refetch_on_focus(mut self, enabled: bool) -> Self {
        self.refetch_on_focus = Some(enabled);
        self
    }

    /// Alert the user when this read fails
    #[must_use]
    pub const fn alert_on_error(mut self, enabled: bool) -> Self {
        self.alert_on_error = enabled;
        self
    }
}

/// Settings shared by CREATE, UPDATE and DELETE
#[derive(Debug, Clone, Default)]
pub struct MutationConfig {
    /// Target; may instead be supplied per invocation
    pub resource: Option<String>,
    /// Keys marked stale after success
    pub invalidate_on_success: Vec<CacheKey>,
    /// Alerts, redirect and callbacks
    pub side_effects: SideEffects,
}

impl MutationConfig {
    /// Mutation whose target is supplied per invocation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutation against a fixed target
    #[must_use]
    pub fn for_resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }

    /// Invalidate `key` (and every key under it) after success
    #[must_use]
    pub fn invalidate(mut self, key: impl Into<CacheKey>) -> Self {
        self.invalidate_on_success.push(key.into());
        self
    }

    /// Show `message` after success
    #[must_use]
    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.side_effects.success_message = Some(message.into());
        self
    }

    /// Navigate to `path` after success
    #[must_use]
    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.side_effects.redirect_to = Some(path.into());
        self
    }

    /// Run `callback` last after success
    #[must_use]
    pub fn on_success(mut self, callback: impl Fn(&ResponseEnvelope) + Send + Sync + 'static) -> Self {
        self.side_effects.on_success = Some(Arc::new(callback));
        self
    }

    /// Run `callback` after the error alert
    #[must_use]
    pub fn on_error(mut self, callback: impl Fn(&AppError) + Send + Sync + 'static) -> Self {
        self.side_effects.on_error = Some(Arc::new(callback));
        self
    }
}

/// Post-completion effects of a mutation
#[derive(Clone, Default)]
pub struct SideEffects {
    /// Success alert text
    pub success_message: Option<String>,
    /// Path to navigate to after success
    pub redirect_to: Option<String>,
    /// Called with the response after every other success effect
    pub on_success: Option<SuccessCallback>,
    /// Called with the error after the error alert
    pub on_error: Option<ErrorCallback>,
}

impl fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffects")
            .field("success_message", &self.success_message)
            .field("redirect_to", &self.redirect_to)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Per-invocation mutation arguments
#[derive(Debug, Clone, Default)]
pub struct MutationInput {
    /// Overrides the configured target
    pub resource: Option<String>,
    /// JSON body
    pub body: Option<Value>,
}

impl MutationInput {
    /// Input with a body and the configured target
    #[must_use]
    pub const fn with_body(body: Value) -> Self {
        Self {
            resource: None,
            body: Some(body),
        }
    }

    /// Override the target for this invocation
    #[must_use]
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_methods() {
        assert_eq!(Operation::Read(ReadConfig::new("a", "a")).method(), Method::Read);
        assert_eq!(Operation::Create(MutationConfig::new()).method(), Method::Create);
        assert_eq!(Operation::Update(MutationConfig::new()).method(), Method::Update);
        assert_eq!(Operation::Delete(MutationConfig::new()).method(), Method::Delete);
    }

    #[test]
    fn test_resource_may_be_deferred() {
        assert_eq!(Operation::Create(MutationConfig::new()).resource(), None);
        assert_eq!(
            Operation::Delete(MutationConfig::for_resource("/posts/1")).resource(),
            Some("/posts/1")
        );
        let input = MutationInput::with_body(json!({"reason": "dup"})).resource("/posts/2");
        assert_eq!(input.resource.as_deref(), Some("/posts/2"));
    }

    #[test]
    fn test_side_effects_debug_hides_callbacks() {
        let config = MutationConfig::new()
            .success_message("Saved")
            .on_success(|_| {})
            .invalidate("athletes");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("on_success: true"));
        assert!(rendered.contains("on_error: false"));
        assert_eq!(config.invalidate_on_success.len(), 1);
    }
}
