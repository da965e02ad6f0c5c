//! Downstream services subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (page or API)
//!     → aggregator.rs (one operation per service, reviews retries once)
//!     → flood.rs (optional redundant reviews calls, results discarded)
//!     → client.rs (single GET, timeout, fallback, metrics)
//!     → endpoint.rs (URL of the target service)
//! ```
//!
//! # Design Decisions
//! - Endpoints are built once from config and shared immutably
//! - No downstream failure ever reaches a handler as an error; handlers see a
//!   status code paired with a body

pub mod aggregator;
pub mod client;
pub mod context;
pub mod endpoint;
pub mod flood;

pub use aggregator::Aggregator;
pub use client::{CallOutcome, CallResult, DownstreamClient, DownstreamError};
pub use context::RequestContext;
pub use endpoint::{Service, ServiceEndpoint, Topology};
