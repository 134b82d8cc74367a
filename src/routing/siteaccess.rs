//! The resolved siteaccess binding.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::routing::lexer::UriLexer;

/// Which kind of matcher produced a siteaccess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MatchingType {
    /// Nothing matched, the configured default was used.
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "uri:map")]
    MapUri,
    #[serde(rename = "host:map")]
    MapHost,
    #[serde(rename = "port:map")]
    MapPort,
    #[serde(rename = "uri:element")]
    UriElement,
    #[serde(rename = "compound:and")]
    Compound,
}

impl MatchingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchingType::Default => "default",
            MatchingType::MapUri => "uri:map",
            MatchingType::MapHost => "host:map",
            MatchingType::MapPort => "port:map",
            MatchingType::UriElement => "uri:element",
            MatchingType::Compound => "compound:and",
        }
    }
}

impl fmt::Display for MatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named site resolved for one request.
///
/// Created once by the [`Router`](crate::routing::Router), bound to the
/// request attributes and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SiteAccess {
    name: String,
    matching_type: MatchingType,
    lexer: Option<Arc<dyn UriLexer>>,
}

impl SiteAccess {
    pub fn new(
        name: impl Into<String>,
        matching_type: MatchingType,
        lexer: Option<Arc<dyn UriLexer>>,
    ) -> Self {
        Self {
            name: name.into(),
            matching_type,
            lexer,
        }
    }

    /// Siteaccess bound to the configured default, without a lexer.
    pub fn default_for(name: impl Into<String>) -> Self {
        Self::new(name, MatchingType::Default, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matching_type(&self) -> MatchingType {
        self.matching_type
    }

    pub fn uri_lexer(&self) -> Option<&dyn UriLexer> {
        self.lexer.as_deref()
    }

    pub fn has_uri_lexer(&self) -> bool {
        self.lexer.is_some()
    }

    /// Semantic path for `path`; identity when the matcher has no lexer.
    pub fn analyse_uri(&self, path: &str) -> String {
        match &self.lexer {
            Some(lexer) => lexer.analyse_uri(path),
            None => path.to_string(),
        }
    }

    /// Outbound link for a semantic path; identity when the matcher has no lexer.
    pub fn analyse_link(&self, path: &str) -> String {
        match &self.lexer {
            Some(lexer) => lexer.analyse_link(path),
            None => path.to_string(),
        }
    }
}

// Lexers are compared by presence only.
impl PartialEq for SiteAccess {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.matching_type == other.matching_type
            && self.lexer.is_some() == other.lexer.is_some()
    }
}

impl fmt::Display for SiteAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.matching_type)
    }
}
