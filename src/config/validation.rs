//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (matchers target known siteaccesses)
//! - Validate matcher parameters (port keys, element index, empty maps)
//! - Validate addresses, log settings and paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, MatcherConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("default siteaccess must not be empty")]
    EmptyDefault,

    #[error("siteaccess `{0}` is not declared in siteaccess.list")]
    UnknownSiteAccess(String),

    #[error("matcher #{index}: {reason}")]
    InvalidMatcher { index: usize, reason: String },

    #[error("index page of `{0}` must not be the site root")]
    RootIndexPage(String),

    #[error("setup path `{0}` must start with '/'")]
    InvalidSetupPath(String),

    #[error("{field}: `{value}` is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("unknown log level `{0}`")]
    InvalidLogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let sa = &config.siteaccess;

    if sa.default.is_empty() {
        errors.push(ValidationError::EmptyDefault);
    }

    let is_known = |name: &str| sa.list.is_empty() || sa.list.iter().any(|n| n == name);
    if !sa.default.is_empty() && !is_known(&sa.default) {
        errors.push(ValidationError::UnknownSiteAccess(sa.default.clone()));
    }

    for (index, matcher) in sa.matchers.iter().enumerate() {
        let mut targets = Vec::new();
        if let Err(reason) = check_matcher(matcher, &mut targets) {
            errors.push(ValidationError::InvalidMatcher { index, reason });
        }
        for target in targets {
            if !is_known(&target) {
                errors.push(ValidationError::UnknownSiteAccess(target));
            }
        }
    }

    if sa.index_page.as_deref().is_some_and(is_root) {
        errors.push(ValidationError::RootIndexPage("siteaccess".to_string()));
    }
    for (name, settings) in &sa.settings {
        if settings.index_page.as_deref().is_some_and(is_root) {
            errors.push(ValidationError::RootIndexPage(name.clone()));
        }
    }

    if !config.setup.path.starts_with('/') {
        errors.push(ValidationError::InvalidSetupPath(config.setup.path.clone()));
    }

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// An index page pointing at the root would forward to itself forever.
fn is_root(path: &str) -> bool {
    path.trim_matches('/').is_empty()
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// Checks matcher parameters, collecting every statically known target name.
fn check_matcher(matcher: &MatcherConfig, targets: &mut Vec<String>) -> Result<(), String> {
    match matcher {
        MatcherConfig::MapUri { map } | MatcherConfig::MapHost { map } => {
            check_map(map.iter(), targets)
        }
        MatcherConfig::MapPort { map } => {
            for key in map.keys() {
                if key.trim().parse::<u16>().is_err() {
                    return Err(format!("port `{key}` is not a valid port number"));
                }
            }
            check_map(map.iter(), targets)
        }
        MatcherConfig::UriElement { value } => {
            if *value == 0 {
                Err("URIElement value must be at least 1".to_string())
            } else {
                Ok(())
            }
        }
        MatcherConfig::Compound { name, matchers } => {
            if matchers.is_empty() {
                return Err("Compound requires at least one child matcher".to_string());
            }
            let mut child_targets = Vec::new();
            for child in matchers {
                check_matcher(child, &mut child_targets)?;
            }
            match name {
                Some(name) if name.is_empty() => {
                    Err("Compound name must not be empty".to_string())
                }
                Some(name) => {
                    targets.push(name.clone());
                    Ok(())
                }
                None => {
                    targets.extend(child_targets);
                    Ok(())
                }
            }
        }
    }
}

fn check_map<'a>(
    entries: impl Iterator<Item = (&'a String, &'a String)>,
    targets: &mut Vec<String>,
) -> Result<(), String> {
    for (key, name) in entries {
        if key.is_empty() {
            return Err("map contains an empty key".to_string());
        }
        if name.is_empty() {
            return Err(format!("map entry `{key}` has an empty siteaccess name"));
        }
        targets.push(name.clone());
    }
    Ok(())
}
