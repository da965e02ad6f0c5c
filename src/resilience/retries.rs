//! Retry logic.
//!
//! # Responsibilities
//! - Bound the number of attempts for a single downstream operation
//! - Retry only when the previous attempt did not resolve to HTTP 200
//!
//! # Design Decisions
//! - The policy is a value handed to one operation, not a middleware applied to
//!   every call; only the reviews lookup retries
//! - No backoff between attempts
//! - The result of the last attempt is returned, success or not

use std::future::Future;

use crate::services::CallResult;

/// Maximum number of attempts for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// One attempt, no retry.
    pub const fn single_attempt() -> Self {
        Self { max_attempts: 1 }
    }

    /// The first attempt plus exactly one retry.
    pub const fn retry_once() -> Self {
        Self { max_attempts: 2 }
    }

    /// Run `attempt` until it yields a 200 or the attempt bound is reached.
    ///
    /// `attempt` receives the 1-based attempt number.
    pub async fn run<F, Fut>(&self, mut attempt: F) -> CallResult
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = CallResult>,
    {
        let mut attempts = 1;
        let mut result = attempt(attempts).await;

        while !result.is_ok() && attempts < self.max_attempts {
            tracing::info!(
                attempt = attempts,
                status = result.status.as_u16(),
                "Retrying downstream call"
            );
            attempts += 1;
            result = attempt(attempts).await;
        }

        result
    }
}
