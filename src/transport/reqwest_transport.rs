// ABOUTME: reqwest implementation of the HTTP transport with pooled connections and timeouts
// ABOUTME: Joins resources onto the base URL and maps failures onto orchestrator error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ApiRequest, ApiResponse, HttpTransport, Method};
use crate::config::HttpConfig;
use crate::constants::http::{REQUEST_ID_HEADER, USER_AGENT};
use crate::envelope::ResponseEnvelope;
use crate::errors::{AppError, AppResult};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Error body shape; only the message matters
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Transport backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport from HTTP configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the base URL does not parse, or
    /// `InternalError` if the client cannot be built
    pub fn new(config: &HttpConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::config_invalid(format!("Invalid base URL {:?}: {e}", config.base_url))
        })?;

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Base URL resources are joined onto
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource against the base URL; absolute URLs pass through
    ///
    /// # Errors
    ///
    /// Returns `MissingResource` for an empty resource, `InvalidInput` if the
    /// joined URL does not parse
    pub fn resolve_url(&self, resource: &str) -> AppResult<Url> {
        let resource = resource.trim();
        if resource.is_empty() {
            return Err(AppError::missing_resource());
        }
        if let Ok(absolute) = Url::parse(resource) {
            if matches!(absolute.scheme(), "http" | "https") {
                return Ok(absolute);
            }
        }

        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            resource.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| AppError::invalid_input(format!("Invalid resource {resource:?}: {e}")))
    }

    const fn http_method(method: Method) -> reqwest::Method {
        match method {
            Method::Read => reqwest::Method::GET,
            Method::Create => reqwest::Method::POST,
            Method::Update => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> AppResult<ApiResponse> {
        let url = self.resolve_url(&request.resource)?;
        debug!(
            http.method = %request.method,
            http.url = %url,
            request.id = %request.request_id,
            "Sending request"
        );

        let mut builder = self
            .client
            .request(Self::http_method(request.method), url.clone())
            .header(REQUEST_ID_HEADER, &request.request_id);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            AppError::from(e)
                .with_request_id(&request.request_id)
                .with_resource(url.as_str())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            AppError::from(e)
                .with_request_id(&request.request_id)
                .with_resource(url.as_str())
        })?;

        if !status.is_success() {
            let server_message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message);
            warn!(
                http.method = %request.method,
                http.url = %url,
                http.status = status.as_u16(),
                request.id = %request.request_id,
                "Request rejected by server"
            );
            return Err(AppError::server_rejected(status.as_u16(), server_message)
                .with_request_id(&request.request_id)
                .with_resource(url.as_str()));
        }

        let envelope = ResponseEnvelope::from_body(&bytes)
            .map_err(|e| e.with_request_id(&request.request_id))?;

        Ok(ApiResponse {
            status: status.as_u16(),
            envelope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::new(&HttpConfig {
            base_url: base.to_owned(),
            ..HttpConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_joins_relative_paths() {
        let t = transport("http://localhost:8080/api/");
        assert_eq!(
            t.resolve_url("/athletes/42").unwrap().as_str(),
            "http://localhost:8080/api/athletes/42"
        );
        assert_eq!(
            transport("http://localhost:8080/api")
                .resolve_url("events")
                .unwrap()
                .as_str(),
            "http://localhost:8080/api/events"
        );
    }

    #[test]
    fn test_resolve_passes_absolute_urls_through() {
        let t = transport("http://localhost:8080/api");
        assert_eq!(
            t.resolve_url("https://files.example.com/upload").unwrap().as_str(),
            "https://files.example.com/upload"
        );
    }

    #[test]
    fn test_empty_resource_rejected() {
        let err = transport("http://localhost:8080/api")
            .resolve_url("  ")
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::MissingResource);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = ReqwestTransport::new(&HttpConfig {
            base_url: "not a url".to_owned(),
            ..HttpConfig::default()
        })
        .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::ConfigInvalid);
    }
}
