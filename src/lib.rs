//! Bookstore product page library.

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod services;

pub use config::schema::ProductPageConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
