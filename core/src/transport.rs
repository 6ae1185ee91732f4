//! The network seam: executes `HttpRequest` values and returns `HttpResponse`
//! values.
//!
//! `MovieClient` is generic over `Transport`, so tests script responses with
//! an in-memory implementation and production code uses `UreqTransport`.
//! The request and response logging helpers live here and are called by the
//! client around every round-trip, whichever transport runs it.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::config::redact_api_key;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations return `Ok` for every response the server sent, whatever
/// its status, and `Err` only when no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }
}

/// `Transport` backed by a blocking `ureq` agent.
///
/// Each call runs on tokio's blocking pool, so the awaiting task is never
/// blocked on the network.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        // Status codes are data for the client to interpret, not errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    fn execute_blocking(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let failed = |cause: String| TransportError {
            url: redact_api_key(&request.url),
            cause,
        };

        let mut builder = match request.method {
            HttpMethod::Get => agent.get(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(|e| failed(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| failed(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let owned = request.clone();
        tokio::task::spawn_blocking(move || Self::execute_blocking(&agent, &owned))
            .await
            .map_err(|e| TransportError {
                url: redact_api_key(&request.url),
                cause: format!("transport task failed: {e}"),
            })?
    }
}

/// Log the outbound request target.
pub fn log_request(request: &HttpRequest) {
    debug!(method = request.method.as_str(), url = %redact_api_key(&request.url), "API request");
}

/// Log a received response with a pretty-printed body.
pub fn log_response(request: &HttpRequest, response: &HttpResponse) {
    let url = redact_api_key(&request.url);
    if response.body.is_empty() {
        trace!(status = response.status, url = %url, "received no data in response");
        return;
    }
    match pretty_json(&response.body) {
        Some(pretty) => trace!(status = response.status, url = %url, "received JSON:\n{pretty}"),
        None => trace!(
            status = response.status,
            url = %url,
            bytes = response.body.len(),
            "received non-JSON body"
        ),
    }
}

/// Pretty-print a JSON body, or `None` when it is not JSON.
pub fn pretty_json(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}
