//! Downstream HTTP client.
//!
//! # Responsibilities
//! - Issue a single GET against a service endpoint with a bounded timeout
//! - Turn every outcome (success, non-200, network failure) into a `CallResult`
//! - Record exactly one metrics observation per call
//!
//! # Design Decisions
//! - Network failures are a variant of `CallOutcome`, never a propagated error
//! - The fallback body is always present: `{"error": "<service message>"}`
//! - A 200 whose body is not JSON resolves like any other failure, with status 500

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

use crate::observability::Metrics;
use crate::services::context::RequestContext;
use crate::services::endpoint::{Service, ServiceEndpoint};

/// Why no response was obtained from a downstream service.
#[derive(Debug, Error)]
pub enum DownstreamError {
    #[error("Downstream timeout for {0}")]
    Timeout(String),

    #[error("Connection to {0} failed: {1}")]
    Connect(String, String),

    #[error("Request to {0} failed: {1}")]
    Request(String, String),

    #[error("Failed to read response body from {0}: {1}")]
    Body(String, String),
}

impl DownstreamError {
    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            DownstreamError::Timeout(url.to_string())
        } else if error.is_connect() {
            DownstreamError::Connect(url.to_string(), error.to_string())
        } else if error.is_body() || error.is_decode() {
            DownstreamError::Body(url.to_string(), error.to_string())
        } else {
            DownstreamError::Request(url.to_string(), error.to_string())
        }
    }
}

/// Raw outcome of one downstream attempt.
#[derive(Debug)]
pub enum CallOutcome {
    /// The service answered, with any status.
    Responded { status: StatusCode, body: Bytes },
    /// No response was obtained.
    NetworkFailure(DownstreamError),
}

impl CallOutcome {
    /// Apply the fallback policy for `service`.
    pub fn resolve(self, service: Service) -> CallResult {
        match self {
            CallOutcome::Responded {
                status: StatusCode::OK,
                body,
            } => match serde_json::from_slice::<Value>(&body) {
                Ok(body) => CallResult {
                    status: StatusCode::OK,
                    body,
                },
                Err(e) => {
                    tracing::warn!(service = service.app_name(), error = %e, "Undecodable response body");
                    CallResult::unavailable(service, StatusCode::INTERNAL_SERVER_ERROR)
                }
            },
            CallOutcome::Responded { status, .. } => CallResult::unavailable(service, status),
            CallOutcome::NetworkFailure(e) => {
                tracing::warn!(service = service.app_name(), error = %e, "Downstream call failed");
                CallResult::unavailable(service, StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Resolved result of a downstream call: a status paired with a body that is
/// either the decoded payload or an error placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct CallResult {
    pub status: StatusCode,
    pub body: Value,
}

impl CallResult {
    pub fn unavailable(service: Service, status: StatusCode) -> Self {
        Self {
            status,
            body: json!({ "error": service.unavailable_message() }),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// The error message, when the body is an error placeholder.
    pub fn error_message(&self) -> Option<&str> {
        if self.is_ok() {
            return None;
        }
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Pooled HTTP client for the downstream services.
#[derive(Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
    timeout: Duration,
    metrics: Metrics,
}

impl DownstreamClient {
    pub fn new(timeout: Duration, metrics: Metrics) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            timeout,
            metrics,
        })
    }

    /// GET `endpoint/path/suffix` once and resolve the outcome.
    pub async fn call(&self, endpoint: &ServiceEndpoint, suffix: &str, ctx: &RequestContext) -> CallResult {
        let started = Instant::now();
        let url = endpoint.url(suffix);

        let outcome = self.send(&url, ctx).await;
        let result = outcome.resolve(endpoint.service);

        self.metrics
            .record_request_result(endpoint.service.app_name(), result.status.as_u16(), started);

        tracing::debug!(
            url = %url,
            status = result.status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Downstream call complete"
        );

        result
    }

    async fn send(&self, url: &str, ctx: &RequestContext) -> CallOutcome {
        let response = self
            .http
            .get(url)
            .headers(ctx.forward_headers().clone())
            .timeout(self.timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => return CallOutcome::NetworkFailure(DownstreamError::from_reqwest(url, e)),
        };

        let status = response.status();
        match response.bytes().await {
            Ok(body) => CallOutcome::Responded { status, body },
            Err(e) => CallOutcome::NetworkFailure(DownstreamError::from_reqwest(url, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_success() {
        let outcome = CallOutcome::Responded {
            status: StatusCode::OK,
            body: Bytes::from_static(br#"{"id":0,"author":"William Shakespeare"}"#),
        };

        let result = outcome.resolve(Service::Details);
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(result.body["author"], "William Shakespeare");
        assert!(result.error_message().is_none());
    }

    #[test]
    fn test_resolve_keeps_key_order() {
        let raw = r#"{"id":0,"author":"William Shakespeare","year":1595,"type":"paperback"}"#;
        let outcome = CallOutcome::Responded {
            status: StatusCode::OK,
            body: Bytes::from_static(raw.as_bytes()),
        };

        let result = outcome.resolve(Service::Details);
        assert_eq!(serde_json::to_string(&result.body).unwrap(), raw);
    }

    #[test]
    fn test_resolve_upstream_error_keeps_status() {
        let outcome = CallOutcome::Responded {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: Bytes::from_static(b"fault filter abort"),
        };

        let result = outcome.resolve(Service::Reviews);
        assert_eq!(result.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            result.body,
            json!({ "error": "Sorry, product reviews are currently unavailable for this book." })
        );
    }

    #[test]
    fn test_resolve_network_failure_is_500() {
        let outcome = CallOutcome::NetworkFailure(DownstreamError::Timeout("http://ratings:9080".into()));

        let result = outcome.resolve(Service::Ratings);
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            result.error_message(),
            Some("Sorry, product ratings are currently unavailable for this book.")
        );
    }

    #[test]
    fn test_resolve_undecodable_success() {
        let outcome = CallOutcome::Responded {
            status: StatusCode::OK,
            body: Bytes::from_static(b"<html>not json</html>"),
        };

        let result = outcome.resolve(Service::Details);
        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.error_message().is_some());
    }

    #[tokio::test]
    async fn test_call_unreachable_records_500() {
        let metrics = Metrics::new();
        let client = DownstreamClient::new(Duration::from_secs(2), metrics.clone()).unwrap();

        // Nothing listens on port 1.
        let endpoint = ServiceEndpoint::new(Service::Details, "http://127.0.0.1:1".into());
        let result = client.call(&endpoint, "0", &RequestContext::default()).await;

        assert_eq!(result.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(result.error_message().is_some());

        let rendered = metrics.render();
        assert!(rendered
            .lines()
            .any(|line| line.starts_with("request_result{")
                && line.contains("destination_app=\"details\"")
                && line.contains("response_code=\"500\"")
                && line.ends_with(" 1")));
    }
}
