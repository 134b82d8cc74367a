//! Siteaccess resolution.
//!
//! # Responsibilities
//! - Store compiled matchers in declaration order
//! - Resolve the siteaccess for a request
//! - Fall back to the configured default when nothing matches
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins
//! - No match is not an error: it resolves to the default siteaccess

use crate::config::schema::SiteAccessConfig;
use crate::observability::metrics;
use crate::routing::matcher::{build_matcher, Matcher, MatcherError};
use crate::routing::request::NormalizedRequest;
use crate::routing::siteaccess::SiteAccess;

/// Ordered set of matchers plus a default siteaccess.
#[derive(Debug)]
pub struct Router {
    default_siteaccess: String,
    matchers: Vec<Box<dyn Matcher>>,
}

impl Router {
    pub fn new(default_siteaccess: impl Into<String>, matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self {
            default_siteaccess: default_siteaccess.into(),
            matchers,
        }
    }

    /// Compile the matcher list of a siteaccess configuration.
    pub fn from_config(config: &SiteAccessConfig) -> Result<Self, MatcherError> {
        let matchers = config
            .matchers
            .iter()
            .map(build_matcher)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            default = %config.default,
            matchers = matchers.len(),
            "Siteaccess router compiled"
        );

        Ok(Self::new(config.default.clone(), matchers))
    }

    pub fn default_siteaccess(&self) -> &str {
        &self.default_siteaccess
    }

    /// Resolve the siteaccess of `request`.
    pub fn match_request(&self, request: &NormalizedRequest) -> SiteAccess {
        let siteaccess = self
            .matchers
            .iter()
            .find_map(|matcher| {
                matcher
                    .match_request(request)
                    .map(|result| SiteAccess::new(result.name, matcher.kind(), result.lexer))
            })
            .unwrap_or_else(|| SiteAccess::default_for(self.default_siteaccess.as_str()));

        tracing::debug!(
            host = %request.host(),
            path = %request.path(),
            siteaccess = %siteaccess.name(),
            matching_type = %siteaccess.matching_type(),
            "Siteaccess matched"
        );
        metrics::record_siteaccess_match(siteaccess.name(), siteaccess.matching_type().as_str());

        siteaccess
    }
}
