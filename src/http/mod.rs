//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → pages.rs / api.rs / session.rs (handlers)
//!     → services::Aggregator (downstream calls)
//!     → views.rs (HTML) or JSON
//!     → Send to client
//! ```

pub mod api;
pub mod pages;
pub mod request;
pub mod server;
pub mod session;
pub mod views;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
