//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the front end.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Siteaccess matching and per-siteaccess settings.
    pub siteaccess: SiteAccessConfig,

    /// Setup wizard interception.
    pub setup: SetupConfig,

    /// Named routes available to the URL generator (name -> path).
    pub routes: BTreeMap<String, String>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Siteaccess matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteAccessConfig {
    /// Siteaccess used when no matcher applies.
    pub default: String,

    /// Known siteaccess names. Empty disables the membership checks.
    pub list: Vec<String>,

    /// Matchers, evaluated in declaration order.
    #[serde(rename = "match")]
    pub matchers: Vec<MatcherConfig>,

    /// Index page used when a siteaccess does not define its own.
    pub index_page: Option<String>,

    /// Per-siteaccess overrides.
    pub settings: BTreeMap<String, SiteAccessSettings>,
}

impl Default for SiteAccessConfig {
    fn default() -> Self {
        Self {
            default: "default".to_string(),
            list: Vec::new(),
            matchers: Vec::new(),
            index_page: None,
            settings: BTreeMap::new(),
        }
    }
}

/// Settings scoped to one siteaccess.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteAccessSettings {
    /// Path served for the site root.
    pub index_page: Option<String>,
}

/// One matcher specification, tagged by `type`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum MatcherConfig {
    /// First path segment -> siteaccess.
    #[serde(rename = "MapURI")]
    MapUri { map: BTreeMap<String, String> },

    /// Host -> siteaccess.
    #[serde(rename = "MapHost")]
    MapHost { map: BTreeMap<String, String> },

    /// Port -> siteaccess. Keys are port numbers written as strings.
    #[serde(rename = "MapPort")]
    MapPort { map: BTreeMap<String, String> },

    /// The first `value` path segments form the siteaccess name.
    #[serde(rename = "URIElement")]
    UriElement { value: usize },

    /// All child matchers must match.
    #[serde(rename = "Compound")]
    Compound {
        #[serde(default)]
        name: Option<String>,
        matchers: Vec<MatcherConfig>,
    },
}

/// Setup wizard interception.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SetupConfig {
    /// Siteaccess name meaning "not installed yet".
    pub siteaccess: String,

    /// Path of the setup route.
    pub path: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            siteaccess: "setup".to_string(),
            path: "/setup".to_string(),
        }
    }
}
