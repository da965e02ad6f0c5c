//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Reject hostnames that cannot form a base URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProductPageConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{ProductPageConfig, ServiceConfig};

/// Minimum length of a session signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 64;

/// A single semantic problem with the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{service}: hostname cannot be empty")]
    EmptyHostname { service: &'static str },

    #[error("{service}: port cannot be 0")]
    InvalidPort { service: &'static str },

    #[error("{service}: '{url}' is not a valid base URL")]
    InvalidBaseUrl { service: &'static str, url: String },

    #[error("timeouts.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("session secret must be at least {} bytes", MIN_SECRET_LEN)]
    ShortSecret,

    #[error("unknown log format '{0}' (expected \"text\" or \"json\")")]
    UnknownLogFormat(String),

    #[error("unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    UnknownLogLevel(String),
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &ProductPageConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let domain = config.services.domain.as_deref();
    validate_service("details", &config.services.details, domain, &mut errors);
    validate_service("reviews", &config.services.reviews, domain, &mut errors);
    validate_service("ratings", &config.services.ratings, domain, &mut errors);

    if config.timeouts.downstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("downstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if let Some(secret) = &config.session.secret {
        if secret.len() < MIN_SECRET_LEN {
            errors.push(ValidationError::ShortSecret);
        }
    }

    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }

    match config.observability.log_format.as_str() {
        "text" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_service(
    service: &'static str,
    config: &ServiceConfig,
    domain: Option<&str>,
    errors: &mut Vec<ValidationError>,
) {
    if config.hostname.trim().is_empty() {
        errors.push(ValidationError::EmptyHostname { service });
        return;
    }
    if config.port == 0 {
        errors.push(ValidationError::InvalidPort { service });
        return;
    }

    let url = config.base_url(domain);
    if url::Url::parse(&url).is_err() {
        errors.push(ValidationError::InvalidBaseUrl { service, url });
    }
}
