//! Per-request context carried into downstream calls.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::http::X_REQUEST_ID;

/// Inbound headers propagated to every downstream call so the mesh can stitch
/// traces together and apply header-based routing.
pub const FORWARDED_HEADERS: &[&str] = &[
    X_REQUEST_ID,
    // Lightstep
    "x-ot-span-context",
    // Datadog
    "x-datadog-trace-id",
    "x-datadog-parent-id",
    "x-datadog-sampling-priority",
    // W3C Trace Context
    "traceparent",
    "tracestate",
    // Cloud Trace
    "x-cloud-trace-context",
    "grpc-trace-bin",
    // B3
    "x-b3-traceid",
    "x-b3-spanid",
    "x-b3-parentspanid",
    "x-b3-sampled",
    "x-b3-flags",
    // SkyWalking
    "sw8",
    "user-agent",
    "cookie",
    "authorization",
    "jwt",
];

/// Header carrying the logged-in user to downstream services.
pub const END_USER: &str = "end-user";

/// Transient state of one inbound request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    user: Option<String>,
    headers: HeaderMap,
}

impl RequestContext {
    /// Build the context from the inbound headers and the session user, if any.
    pub fn new(inbound: &HeaderMap, user: Option<String>) -> Self {
        let mut headers = HeaderMap::new();

        for &name in FORWARDED_HEADERS {
            for value in inbound.get_all(name) {
                headers.append(HeaderName::from_static(name), value.clone());
            }
        }

        if let Some(user) = user.as_deref() {
            match HeaderValue::from_str(user) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(END_USER), value);
                }
                Err(_) => tracing::debug!(user = %user, "User name is not a valid header value"),
            }
        }

        Self { user, headers }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Headers to attach to downstream requests.
    pub fn forward_headers(&self) -> &HeaderMap {
        &self.headers
    }
}
