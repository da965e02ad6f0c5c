//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define product page metrics
//! - Record one observation per downstream call attempt
//! - Render the Prometheus text exposition served on `/metrics`
//!
//! # Metrics
//! - `request_result` (counter): downstream call attempts by `destination_app`, `response_code`
//! - `request_duration_seconds` (histogram): downstream call latency by `destination_app`
//!
//! # Design Decisions
//! - Each `Metrics` owns its own Prometheus recorder instead of the global one,
//!   so independent servers (and tests) never share counters
//! - Counter updates are atomic; no locks on the hot path

use std::sync::Arc;
use std::time::Instant;

use metrics::Unit;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const REQUEST_RESULT: &str = "request_result";
pub const REQUEST_DURATION: &str = "request_duration_seconds";

/// Recorder and exposition handle for the service's metrics.
#[derive(Clone)]
pub struct Metrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl Metrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            metrics::describe_counter!(REQUEST_RESULT, "Results of requests");
            metrics::describe_histogram!(
                REQUEST_DURATION,
                Unit::Seconds,
                "Duration of downstream requests"
            );
        });

        Self {
            recorder: Arc::new(recorder),
            handle,
        }
    }

    /// Record the resolved outcome of one downstream call attempt.
    pub fn record_request_result(&self, destination_app: &'static str, response_code: u16, started: Instant) {
        let elapsed = started.elapsed().as_secs_f64();

        metrics::with_local_recorder(self.recorder.as_ref(), || {
            metrics::counter!(
                REQUEST_RESULT,
                "destination_app" => destination_app,
                "response_code" => response_code.to_string()
            )
            .increment(1);

            metrics::histogram!(REQUEST_DURATION, "destination_app" => destination_app)
                .record(elapsed);
        });
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.run_upkeep();
        self.handle.render()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
