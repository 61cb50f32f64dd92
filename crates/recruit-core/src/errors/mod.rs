// ABOUTME: Unified error type, error codes and result alias for the request orchestrator
// ABOUTME: Distinguishes transport, server-reported, decryption and configuration failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Unified Error Handling System
//!
//! Every fallible operation in the workspace returns [`AppResult`]. Errors carry an
//! [`ErrorCode`] for programmatic matching, a human-readable message, and an
//! [`ErrorContext`] with request metadata. The context keeps the message the
//! backend sent (if any) apart from the transport-level message so user-facing
//! alerts can prefer the former.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Standard error codes used throughout the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller supplied an invalid argument
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// No target resource was configured or supplied at invocation time
    #[serde(rename = "MISSING_RESOURCE")]
    MissingResource = 3001,

    // Transport (5000-5999)
    /// The request never completed (connection refused, reset, DNS)
    #[serde(rename = "TRANSPORT_FAILED")]
    TransportFailed = 5000,
    /// The request timed out
    #[serde(rename = "TIMEOUT")]
    Timeout = 5001,
    /// The backend answered with a non-2xx status or `success: false`
    #[serde(rename = "SERVER_REJECTED")]
    ServerRejected = 5002,

    // Payload (7000-7999)
    /// Ciphertext could not be decoded or authenticated
    #[serde(rename = "DECRYPTION_FAILED")]
    DecryptionFailed = 7000,
    /// JSON could not be serialized or parsed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 7001,

    // Lifecycle (8000-8999)
    /// The invocation was cancelled before it settled
    #[serde(rename = "CANCELLED")]
    Cancelled = 8000,

    // Configuration (6000-6999)
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration is present but invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code associated with this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingResource => 400,
            Self::ServerRejected | Self::TransportFailed => 502,
            Self::Timeout => 504,
            Self::Cancelled => 499,
            Self::DecryptionFailed
            | Self::SerializationError
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingResource => "No target resource was provided for the request",
            Self::TransportFailed => "The request could not be completed",
            Self::Timeout => "The request timed out",
            Self::ServerRejected => "The server rejected the request",
            Self::DecryptionFailed => "The response payload could not be decrypted",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::Cancelled => "The request was cancelled",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether a read that failed with this code may be retried regardless of status
    ///
    /// `ServerRejected` depends on the status, see [`AppError::is_retryable`].
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::TransportFailed | Self::Timeout)
    }
}

/// Additional context attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID sent in the `x-request-id` header
    pub request_id: Option<String>,
    /// Resource path or URL the request targeted
    pub resource: Option<String>,
    /// HTTP status returned by the backend, when one was received
    pub status: Option<u16>,
    /// Message supplied by the backend in its error body
    pub server_message: Option<String>,
}

/// Unified error type for the client
#[derive(Debug, Clone, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Add the targeted resource to the error context
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.context.resource = Some(resource.into());
        self
    }

    /// Add the HTTP status to the error context
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.context.status = Some(status);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Message to show the user: the backend's message when it sent one,
    /// otherwise this error's own message
    #[must_use]
    pub fn alert_message(&self) -> &str {
        self.context
            .server_message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.message)
    }

    /// Whether this error came from a cancelled invocation
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.code, ErrorCode::Cancelled)
    }

    /// Whether a read that failed this way may be retried
    ///
    /// Server rejections are retried only for 5xx statuses; 4xx responses and
    /// `success: false` envelopes settle immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self.code {
            ErrorCode::ServerRejected => {
                self.context.status.is_some_and(|status| status >= 500)
            }
            code => code.is_retryable(),
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.context
            .status
            .unwrap_or_else(|| self.code.http_status())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// No resource configured or supplied for a request
    #[must_use]
    pub fn missing_resource() -> Self {
        Self::new(
            ErrorCode::MissingResource,
            "A resource must be configured or supplied when invoking the request",
        )
    }

    /// Transport failure (request never completed)
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TransportFailed, message)
    }

    /// Request timed out
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    /// Backend rejected the request, optionally with its own message
    #[must_use]
    pub fn server_rejected(status: u16, server_message: Option<String>) -> Self {
        let mut error = Self::new(
            ErrorCode::ServerRejected,
            format!("Request failed with status code {status}"),
        )
        .with_status(status);
        error.context.server_message = server_message;
        error
    }

    /// Payload decryption failed
    #[must_use]
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DecryptionFailed, message)
    }

    /// Serialization or parse failure
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Invocation cancelled by the caller
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorCode::Cancelled, "Request cancelled before completion")
    }

    /// Required configuration missing
    #[must_use]
    pub fn config_missing(name: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{} is not set", name.into()),
        )
    }

    /// Configuration value present but invalid
    #[must_use]
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

#[cfg(feature = "http-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        let mapped = if error.is_timeout() {
            Self::timeout(message)
        } else if let Some(status) = error.status() {
            Self::server_rejected(status.as_u16(), None)
        } else if error.is_decode() {
            Self::serialization(message)
        } else {
            Self::transport(message)
        };
        mapped.with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::Timeout.http_status(), 504);
        assert_eq!(ErrorCode::ServerRejected.http_status(), 502);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_server_message_preferred_for_alerts() {
        let error = AppError::server_rejected(422, Some("Email already taken".to_owned()));
        assert_eq!(error.alert_message(), "Email already taken");
        assert_eq!(error.http_status(), 422);

        let error = AppError::server_rejected(500, None);
        assert_eq!(error.alert_message(), "Request failed with status code 500");

        let error = AppError::server_rejected(500, Some(String::new()));
        assert_eq!(error.alert_message(), "Request failed with status code 500");
    }

    #[test]
    fn test_display_includes_description() {
        let error = AppError::transport("connection refused");
        assert_eq!(
            error.to_string(),
            "The request could not be completed: connection refused"
        );
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ErrorCode::TransportFailed.is_retryable());
        assert!(ErrorCode::Timeout.is_retryable());
        assert!(!ErrorCode::ServerRejected.is_retryable());
        assert!(!ErrorCode::DecryptionFailed.is_retryable());
        assert!(!ErrorCode::Cancelled.is_retryable());
    }

    #[test]
    fn test_server_rejections_retry_only_on_5xx() {
        assert!(AppError::server_rejected(503, None).is_retryable());
        assert!(AppError::server_rejected(500, None).is_retryable());
        assert!(!AppError::server_rejected(404, None).is_retryable());
        assert!(!AppError::server_rejected(422, None).is_retryable());
        assert!(
            !AppError::server_rejected(200, Some("Session expired".to_owned())).is_retryable()
        );
        assert!(!AppError::new(ErrorCode::ServerRejected, "no status").is_retryable());
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json");
        let error = AppError::from(parse.unwrap_err());
        assert_eq!(error.code, ErrorCode::SerializationError);
        assert!(error.source.is_some());
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::DecryptionFailed).unwrap();
        assert_eq!(json, "\"DECRYPTION_FAILED\"");
    }
}
