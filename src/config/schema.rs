//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the product page.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the product page service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProductPageConfig {
    /// Downstream service locations.
    pub services: ServicesConfig,

    /// Number of redundant reviews calls issued before rendering the page.
    /// Zero disables load generation.
    pub flood_factor: u32,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Locations of the three downstream services.
///
/// A service section may set only some of its keys; the rest keep that
/// service's defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "ServicesFile")]
pub struct ServicesConfig {
    /// Optional domain suffix appended to every hostname (e.g. "default.svc.cluster.local").
    pub domain: Option<String>,

    pub details: ServiceConfig,
    pub reviews: ServiceConfig,
    pub ratings: ServiceConfig,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            domain: None,
            details: ServiceConfig::new("details"),
            reviews: ServiceConfig::new("reviews"),
            ratings: ServiceConfig::new("ratings"),
        }
    }
}

/// `[services]` as written in the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServicesFile {
    domain: Option<String>,
    details: ServiceFile,
    reviews: ServiceFile,
    ratings: ServiceFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServiceFile {
    hostname: Option<String>,
    port: Option<u16>,
}

impl ServiceFile {
    fn or_default(self, hostname: &str) -> ServiceConfig {
        ServiceConfig {
            hostname: self.hostname.unwrap_or_else(|| hostname.to_string()),
            port: self.port.unwrap_or_else(default_service_port),
        }
    }
}

impl From<ServicesFile> for ServicesConfig {
    fn from(file: ServicesFile) -> Self {
        Self {
            domain: file.domain,
            details: file.details.or_default("details"),
            reviews: file.reviews.or_default("reviews"),
            ratings: file.ratings.or_default("ratings"),
        }
    }
}

/// A single downstream service location.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Hostname, without the domain suffix.
    pub hostname: String,

    /// Service port.
    pub port: u16,
}

impl ServiceConfig {
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            port: default_service_port(),
        }
    }

    /// Base URL of the service, e.g. `http://reviews.default.svc:9080`.
    pub fn base_url(&self, domain: Option<&str>) -> String {
        match domain.filter(|d| !d.is_empty()) {
            Some(domain) => format!("http://{}.{}:{}", self.hostname, domain, self.port),
            None => format!("http://{}:{}", self.hostname, self.port),
        }
    }
}

fn default_service_port() -> u16 {
    9080
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for a single downstream GET in seconds.
    pub downstream_secs: u64,

    /// Deadline for serving one inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            downstream_secs: 60,
            // Room for the details call plus both reviews attempts.
            request_secs: 300,
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Secret used to sign the session cookie. A random key is generated when unset,
    /// which invalidates sessions on restart.
    pub secret: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("text" or "json").
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}
