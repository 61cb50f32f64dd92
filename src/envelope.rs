// ABOUTME: Response envelope returned by the backend for every request
// ABOUTME: Success flag, payload (plain or ciphertext), and pagination metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend response envelope
//!
//! `{ success, payload, metadata?, message? }`. On READs a string `payload` is
//! ciphertext and is replaced by its decrypted JSON before callers see it.

use crate::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const fn default_success() -> bool {
    true
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Current page (one-based)
    #[serde(default)]
    pub page: u32,
    /// Total number of pages
    #[serde(default)]
    pub pages: u32,
    /// Total number of matching records
    #[serde(default)]
    pub total_count: u64,
    /// Previous page, if any
    #[serde(default)]
    pub prev_page: Option<u32>,
    /// Next page, if any
    #[serde(default)]
    pub next_page: Option<u32>,
}

impl PageMetadata {
    /// Whether another page follows this one
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page.is_some() || self.page < self.pages
    }

    /// Whether a page precedes this one
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.prev_page.is_some() || self.page > 1
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Backend success flag; absent means success
    #[serde(default = "default_success")]
    pub success: bool,
    /// Domain data
    #[serde(default)]
    pub payload: Value,
    /// Pagination metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
    /// Backend message, typically present on failures and some mutations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    /// Successful envelope around a payload
    #[must_use]
    pub const fn ok(payload: Value) -> Self {
        Self {
            success: true,
            payload,
            metadata: None,
            message: None,
        }
    }

    /// Parse a response body; an empty body is an empty successful envelope
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the body is not a JSON object of the expected shape
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::ok(Value::Null));
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::serialization(format!("Unexpected response body: {e}")))
    }

    /// Whether the payload is still ciphertext
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        matches!(self.payload, Value::String(_))
    }

    /// Decode the payload into a typed value
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the payload does not match `T`
    pub fn payload_as<T: DeserializeOwned>(&self) -> AppResult<T> {
        T::deserialize(&self.payload)
            .map_err(|e| AppError::serialization(format!("Payload has unexpected shape: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_full_envelope() {
        let body = json!({
            "success": true,
            "payload": [{"id": 1}],
            "metadata": {"page": 1, "pages": 3, "totalCount": 25, "prevPage": null, "nextPage": 2}
        })
        .to_string();
        let envelope = ResponseEnvelope::from_body(body.as_bytes()).unwrap();
        assert!(envelope.success);
        let metadata = envelope.metadata.unwrap();
        assert_eq!(metadata.total_count, 25);
        assert!(metadata.has_next_page());
        assert!(!metadata.has_prev_page());
    }

    #[test]
    fn test_missing_success_defaults_to_true() {
        let envelope = ResponseEnvelope::from_body(br#"{"payload": {"ok": 1}}"#).unwrap();
        assert!(envelope.success);
        assert!(!envelope.is_encrypted());
    }

    #[test]
    fn test_empty_body_is_empty_success() {
        let envelope = ResponseEnvelope::from_body(b"").unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.payload, Value::Null);
    }

    #[test]
    fn test_string_payload_is_encrypted() {
        let envelope = ResponseEnvelope::ok(Value::String("abc".to_owned()));
        assert!(envelope.is_encrypted());
    }

    #[test]
    fn test_payload_as_typed() {
        #[derive(Deserialize)]
        struct Event {
            name: String,
        }
        let envelope = ResponseEnvelope::ok(json!({"name": "Spring Showcase"}));
        let event: Event = envelope.payload_as().unwrap();
        assert_eq!(event.name, "Spring Showcase");
        assert!(envelope.payload_as::<Vec<u8>>().is_err());
    }
}
