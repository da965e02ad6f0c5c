//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::ProductPageConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then apply environment overrides
/// and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<ProductPageConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProductPageConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Override configuration values from environment-style variables.
///
/// `lookup` returns the value of a variable, or `None` when it is unset.
pub fn apply_env_overrides<F>(config: &mut ProductPageConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let services = &mut config.services;

    if let Some(domain) = lookup("SERVICES_DOMAIN") {
        services.domain = Some(domain);
    }

    for (hostname_var, port_var, service) in [
        ("DETAILS_HOSTNAME", "DETAILS_SERVICE_PORT", &mut services.details),
        ("REVIEWS_HOSTNAME", "REVIEWS_SERVICE_PORT", &mut services.reviews),
        ("RATINGS_HOSTNAME", "RATINGS_SERVICE_PORT", &mut services.ratings),
    ] {
        if let Some(hostname) = lookup(hostname_var) {
            service.hostname = hostname;
        }
        if let Some(port) = parse_var(&lookup, port_var)? {
            service.port = port;
        }
    }

    if let Some(flood_factor) = parse_var(&lookup, "FLOOD_FACTOR")? {
        config.flood_factor = flood_factor;
    }
    if let Some(secs) = parse_var(&lookup, "DOWNSTREAM_TIMEOUT_SECS")? {
        config.timeouts.downstream_secs = secs;
    }
    if let Some(secret) = lookup("SESSION_SECRET") {
        config.session.secret = Some(secret);
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.observability.log_format = format;
    }

    Ok(())
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
        None => Ok(None),
    }
}
