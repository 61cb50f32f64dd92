// ABOUTME: HTTP transport seam between the orchestrator and the network
// ABOUTME: Request/response types and the pluggable transport trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport
//!
//! The orchestrator builds an [`ApiRequest`] and hands it to an
//! [`HttpTransport`]. Implementations return an [`ApiResponse`] for every 2xx
//! answer and an error for everything else, so transport failures and server
//! rejections reach the caller through the same channel.

/// `reqwest`-backed transport
pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

use crate::envelope::ResponseEnvelope;
use crate::errors::AppResult;
use serde_json::Value;
use std::fmt;

/// Request verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET with resolved query parameters
    Read,
    /// POST with a JSON body
    Create,
    /// PUT with a JSON body
    Update,
    /// DELETE with a JSON body
    Delete,
}

impl Method {
    /// HTTP method name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "GET",
            Self::Create => "POST",
            Self::Update => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the verb changes server state
    #[must_use]
    pub const fn is_mutation(self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Verb
    pub method: Method,
    /// Path relative to the base URL, or an absolute URL
    pub resource: String,
    /// Query-string pairs (READ only)
    pub query: Vec<(&'static str, String)>,
    /// JSON body (mutations only)
    pub body: Option<Value>,
    /// Correlation id sent as `x-request-id`
    pub request_id: String,
}

impl ApiRequest {
    /// READ request carrying query pairs
    #[must_use]
    pub fn read(
        resource: impl Into<String>,
        query: Vec<(&'static str, String)>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            method: Method::Read,
            resource: resource.into(),
            query,
            body: None,
            request_id: request_id.into(),
        }
    }

    /// Mutation request carrying an optional JSON body
    #[must_use]
    pub fn mutation(
        method: Method,
        resource: impl Into<String>,
        body: Option<Value>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            method,
            resource: resource.into(),
            query: Vec::new(),
            body,
            request_id: request_id.into(),
        }
    }
}

/// A 2xx answer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status
    pub status: u16,
    /// Decoded body
    pub envelope: ResponseEnvelope,
}

/// Sends requests to the backend
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one request
    ///
    /// # Errors
    ///
    /// `TransportFailed` or `Timeout` when no response arrived,
    /// `ServerRejected` for a non-2xx status (with the body's `message`),
    /// `SerializationError` for an unparseable body
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse>;
}
