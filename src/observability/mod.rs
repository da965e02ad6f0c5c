//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Downstream client and handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the inbound request into every downstream call
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

pub use metrics::Metrics;
