//! Siteaccess matching strategies.
//!
//! # Responsibilities
//! - Map the first path segment to a siteaccess (`MapURI`)
//! - Map the host to a siteaccess (`MapHost`, exact and case-sensitive)
//! - Map the effective port to a siteaccess (`MapPort`)
//! - Derive the name from the leading path segments (`URIElement`)
//! - Combine matchers with AND semantics (`Compound`)
//!
//! # Design Decisions
//! - Matchers are compiled once from configuration and shared read-only
//! - Per-request state (the matched prefix) lives in the returned lexer,
//!   never in the matcher
//! - Malformed parameters fail at compile time, never at match time

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::MatcherConfig;
use crate::routing::lexer::{CompoundLexer, PrefixLexer, UriLexer};
use crate::routing::request::NormalizedRequest;
use crate::routing::siteaccess::MatchingType;

/// Errors raised while compiling matcher configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatcherError {
    #[error("{kind} map contains an empty key")]
    EmptyKey { kind: MatchingType },

    #[error("{kind} map entry `{key}` targets an empty siteaccess name")]
    EmptyTarget { kind: MatchingType, key: String },

    #[error("port map key `{0}` is not a valid port number")]
    InvalidPort(String),

    #[error("URIElement index must be at least 1, got {0}")]
    InvalidElementIndex(usize),

    #[error("compound matcher has no child matchers")]
    EmptyCompound,
}

/// Outcome of a successful match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub name: String,
    pub lexer: Option<Arc<dyn UriLexer>>,
}

/// Trait for resolving a siteaccess from a request.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Tag reported on the resulting siteaccess.
    fn kind(&self) -> MatchingType;

    /// Returns the matched siteaccess, or `None` to fall through.
    fn match_request(&self, request: &NormalizedRequest) -> Option<MatchResult>;
}

/// Compile one matcher specification.
pub fn build_matcher(config: &MatcherConfig) -> Result<Box<dyn Matcher>, MatcherError> {
    let matcher: Box<dyn Matcher> = match config {
        MatcherConfig::MapUri { map } => Box::new(MapUriMatcher::new(
            checked_map(MatchingType::MapUri, map.iter())?,
        )),
        MatcherConfig::MapHost { map } => Box::new(MapHostMatcher::new(
            checked_map(MatchingType::MapHost, map.iter())?,
        )),
        MatcherConfig::MapPort { map } => {
            let mut ports = HashMap::with_capacity(map.len());
            for (key, name) in checked_map(MatchingType::MapPort, map.iter())? {
                let port = key
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| MatcherError::InvalidPort(key.clone()))?;
                ports.insert(port, name);
            }
            Box::new(MapPortMatcher::new(ports))
        }
        MatcherConfig::UriElement { value } => Box::new(UriElementMatcher::new(*value)?),
        MatcherConfig::Compound { name, matchers } => {
            let children = matchers
                .iter()
                .map(build_matcher)
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(CompoundMatcher::new(name.clone(), children)?)
        }
    };
    Ok(matcher)
}

fn checked_map<'a>(
    kind: MatchingType,
    entries: impl Iterator<Item = (&'a String, &'a String)>,
) -> Result<HashMap<String, String>, MatcherError> {
    let mut map = HashMap::new();
    for (key, name) in entries {
        if key.is_empty() {
            return Err(MatcherError::EmptyKey { kind });
        }
        if name.is_empty() {
            return Err(MatcherError::EmptyTarget {
                kind,
                key: key.clone(),
            });
        }
        map.insert(key.clone(), name.clone());
    }
    Ok(map)
}

/// Matches the first path segment against a lookup table.
#[derive(Debug, Clone)]
pub struct MapUriMatcher {
    map: HashMap<String, String>,
}

impl MapUriMatcher {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }
}

impl Matcher for MapUriMatcher {
    fn kind(&self) -> MatchingType {
        MatchingType::MapUri
    }

    fn match_request(&self, request: &NormalizedRequest) -> Option<MatchResult> {
        let key = request.segments().next()?;
        let name = self.map.get(key)?;
        Some(MatchResult {
            name: name.clone(),
            lexer: Some(Arc::new(PrefixLexer::from_segments([key]))),
        })
    }
}

/// Matches the host exactly.
#[derive(Debug, Clone)]
pub struct MapHostMatcher {
    map: HashMap<String, String>,
}

impl MapHostMatcher {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }
}

impl Matcher for MapHostMatcher {
    fn kind(&self) -> MatchingType {
        MatchingType::MapHost
    }

    fn match_request(&self, request: &NormalizedRequest) -> Option<MatchResult> {
        self.map.get(request.host()).map(|name| MatchResult {
            name: name.clone(),
            lexer: None,
        })
    }
}

/// Matches the effective port.
#[derive(Debug, Clone)]
pub struct MapPortMatcher {
    map: HashMap<u16, String>,
}

impl MapPortMatcher {
    pub fn new(map: HashMap<u16, String>) -> Self {
        Self { map }
    }
}

impl Matcher for MapPortMatcher {
    fn kind(&self) -> MatchingType {
        MatchingType::MapPort
    }

    fn match_request(&self, request: &NormalizedRequest) -> Option<MatchResult> {
        let port = request.effective_port()?;
        self.map.get(&port).map(|name| MatchResult {
            name: name.clone(),
            lexer: None,
        })
    }
}

/// Uses the first `elements` path segments, joined with `_`, as the name.
///
/// `/test/foo/bar` with two elements resolves to `test_foo`. Every one of
/// the leading segments must be present and non-empty.
#[derive(Debug, Clone)]
pub struct UriElementMatcher {
    elements: usize,
}

impl UriElementMatcher {
    pub fn new(elements: usize) -> Result<Self, MatcherError> {
        if elements == 0 {
            return Err(MatcherError::InvalidElementIndex(elements));
        }
        Ok(Self { elements })
    }
}

impl Matcher for UriElementMatcher {
    fn kind(&self) -> MatchingType {
        MatchingType::UriElement
    }

    fn match_request(&self, request: &NormalizedRequest) -> Option<MatchResult> {
        let segments: Vec<&str> = request.segments().take(self.elements).collect();
        if segments.len() < self.elements || segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        Some(MatchResult {
            name: segments.join("_"),
            lexer: Some(Arc::new(PrefixLexer::from_segments(&segments))),
        })
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct CompoundMatcher {
    name: Option<String>,
    matchers: Vec<Box<dyn Matcher>>,
}

impl CompoundMatcher {
    /// `name` overrides the children's names; without it the last child wins.
    pub fn new(
        name: Option<String>,
        matchers: Vec<Box<dyn Matcher>>,
    ) -> Result<Self, MatcherError> {
        if matchers.is_empty() {
            return Err(MatcherError::EmptyCompound);
        }
        Ok(Self { name, matchers })
    }
}

impl Matcher for CompoundMatcher {
    fn kind(&self) -> MatchingType {
        MatchingType::Compound
    }

    fn match_request(&self, request: &NormalizedRequest) -> Option<MatchResult> {
        let mut last_name = None;
        let mut lexers = Vec::new();

        // All matchers must pass (AND)
        for matcher in &self.matchers {
            let result = matcher.match_request(request)?;
            lexers.extend(result.lexer);
            last_name = Some(result.name);
        }

        Some(MatchResult {
            name: self.name.clone().or(last_name)?,
            lexer: CompoundLexer::compose(lexers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn req(url: &str) -> NormalizedRequest {
        NormalizedRequest::from_url(url).unwrap()
    }

    #[test]
    fn test_map_uri_matcher() {
        let matcher = MapUriMatcher::new(map(&[("first_sa", "first_sa"), ("fr", "french")]));

        let result = matcher.match_request(&req("http://example.com/fr/foo")).unwrap();
        assert_eq!(result.name, "french");
        let lexer = result.lexer.unwrap();
        assert_eq!(lexer.analyse_uri("/fr/foo"), "/foo");
        assert_eq!(lexer.analyse_link("/foo"), "/fr/foo");

        assert!(matcher.match_request(&req("http://example.com/first_salt")).is_none());
        assert!(matcher.match_request(&req("http://example.com/?first_sa")).is_none());
        // Double slashes are not collapsed
        assert!(matcher.match_request(&req("http://example.com//first_sa//")).is_none());
    }

    #[test]
    fn test_map_host_matcher() {
        let matcher = MapHostMatcher::new(map(&[("first_sa", "first_sa")]));

        for url in ["http://first_sa/", "https://first_sa/", "http://first_sa:81/foo"] {
            let result = matcher.match_request(&req(url)).unwrap();
            assert_eq!(result.name, "first_sa");
            assert!(result.lexer.is_none());
        }
        assert!(matcher.match_request(&req("http://example.com/first_sa")).is_none());
    }

    #[test]
    fn test_map_host_is_case_sensitive() {
        let matcher = MapHostMatcher::new(map(&[("Example", "upper")]));
        let request = NormalizedRequest::new("http", "example", None, "/", "");
        assert!(matcher.match_request(&request).is_none());
    }

    #[test]
    fn test_map_port_matcher() {
        let matcher = MapPortMatcher::new(HashMap::from([
            (80, "plain".to_string()),
            (8443, "secure".to_string()),
        ]));

        assert_eq!(matcher.match_request(&req("http://example.com/")).unwrap().name, "plain");
        assert_eq!(
            matcher.match_request(&req("https://example.com:8443/x")).unwrap().name,
            "secure"
        );
        assert!(matcher.match_request(&req("https://example.com/")).is_none());
    }

    #[test]
    fn test_uri_element_matcher() {
        let matcher = UriElementMatcher::new(2).unwrap();

        let result = matcher.match_request(&req("http://example.com/test/foo/bar/")).unwrap();
        assert_eq!(result.name, "test_foo");
        let lexer = result.lexer.unwrap();
        assert_eq!(lexer.analyse_uri("/test/foo/bar/"), "/bar/");
        assert_eq!(lexer.analyse_link("/bar/"), "/test/foo/bar/");

        assert!(matcher.match_request(&req("http://example.com/test")).is_none());
        assert!(matcher.match_request(&req("http://example.com/first_sa/")).is_none());
        assert!(matcher.match_request(&req("http://example.com/foo//bar/")).is_none());
    }

    #[test]
    fn test_uri_element_single() {
        let matcher = UriElementMatcher::new(1).unwrap();
        let result = matcher.match_request(&req("http://example.com/site/a")).unwrap();
        assert_eq!(result.name, "site");
        assert!(matcher.match_request(&req("http://example.com/")).is_none());
    }

    #[test]
    fn test_compound_matcher_requires_all() {
        let compound = CompoundMatcher::new(
            Some("fr_shop".to_string()),
            vec![
                Box::new(MapHostMatcher::new(map(&[("shop.example.com", "shop")]))),
                Box::new(MapUriMatcher::new(map(&[("fr", "french")]))),
            ],
        )
        .unwrap();

        let result = compound
            .match_request(&req("http://shop.example.com/fr/cart"))
            .unwrap();
        assert_eq!(result.name, "fr_shop");
        assert_eq!(result.lexer.unwrap().analyse_uri("/fr/cart"), "/cart");

        // Flip one child to fail
        assert!(compound.match_request(&req("http://www.example.com/fr/cart")).is_none());
        assert!(compound.match_request(&req("http://shop.example.com/de/cart")).is_none());
    }

    #[test]
    fn test_compound_without_name_uses_last_child() {
        let compound = CompoundMatcher::new(
            None,
            vec![
                Box::new(MapUriMatcher::new(map(&[("fr", "french")]))),
                Box::new(MapPortMatcher::new(HashMap::from([(8080, "dev".to_string())]))),
            ],
        )
        .unwrap();

        let result = compound.match_request(&req("http://example.com:8080/fr/")).unwrap();
        assert_eq!(result.name, "dev");
    }

    #[test]
    fn test_build_rejects_malformed() {
        let port = MatcherConfig::MapPort {
            map: BTreeMap::from([("eighty".to_string(), "sa".to_string())]),
        };
        assert_eq!(
            build_matcher(&port).unwrap_err(),
            MatcherError::InvalidPort("eighty".to_string())
        );

        let element = MatcherConfig::UriElement { value: 0 };
        assert_eq!(
            build_matcher(&element).unwrap_err(),
            MatcherError::InvalidElementIndex(0)
        );

        let compound = MatcherConfig::Compound {
            name: None,
            matchers: Vec::new(),
        };
        assert_eq!(build_matcher(&compound).unwrap_err(), MatcherError::EmptyCompound);

        let empty = MatcherConfig::MapUri {
            map: BTreeMap::from([(String::new(), "sa".to_string())]),
        };
        assert_eq!(
            build_matcher(&empty).unwrap_err(),
            MatcherError::EmptyKey { kind: MatchingType::MapUri }
        );
    }

    #[test]
    fn test_build_port_map() {
        let config = MatcherConfig::MapPort {
            map: BTreeMap::from([("81".to_string(), "first_sa".to_string())]),
        };
        let matcher = build_matcher(&config).unwrap();
        assert_eq!(matcher.kind(), MatchingType::MapPort);
        assert_eq!(
            matcher.match_request(&req("http://example.com:81/")).unwrap().name,
            "first_sa"
        );
    }
}
