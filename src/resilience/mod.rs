//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Aggregator operation:
//!     → retries.rs (bounded attempts for that operation only)
//!     → DownstreamClient::call (per-call timeout, fallback on failure)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every downstream call has a deadline
//! - Retries are opt-in per operation

pub mod retries;

pub use retries::RetryPolicy;
