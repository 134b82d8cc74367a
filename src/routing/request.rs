//! Normalized request projection.
//!
//! # Responsibilities
//! - Project an inbound request into scheme, host, port, path and query
//! - Segment the path for URI based matchers
//!
//! # Design Decisions
//! - Immutable once built; matchers only ever borrow it
//! - Consecutive separators are never collapsed: `//a//b` has the
//!   segments `["", "a", "", "b"]`
//! - The raw query string is kept verbatim for redirects
//! - URLs are split, never normalized: host case and `.`/`..` segments
//!   reach the matchers exactly as written

use axum::http::uri::{InvalidUri, Uri};
use thiserror::Error;

/// Errors raised while parsing an absolute URL.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(#[from] InvalidUri),

    #[error("URL `{0}` has no scheme or host")]
    NotAbsolute(String),
}

/// Immutable projection of an inbound request used for siteaccess matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
    query_string: String,
    query: Vec<(String, String)>,
}

impl NormalizedRequest {
    /// Build from already extracted parts.
    ///
    /// `port` is `None` when the scheme default applies. An empty path is
    /// stored as `/`.
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: Option<u16>,
        path: impl Into<String>,
        query_string: impl Into<String>,
    ) -> Self {
        let mut path = path.into();
        if path.is_empty() {
            path.push('/');
        }
        let query_string = query_string.into();
        let query = parse_query(&query_string);

        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            path,
            query_string,
            query,
        }
    }

    /// Parse an absolute URL such as `http://example.com:8080/foo?bar=baz`.
    pub fn from_url(input: &str) -> Result<Self, UrlError> {
        let uri: Uri = input.parse()?;
        let not_absolute = || UrlError::NotAbsolute(input.to_string());

        let scheme = uri.scheme_str().ok_or_else(not_absolute)?;
        let authority = uri
            .authority()
            .filter(|authority| !authority.host().is_empty())
            .ok_or_else(not_absolute)?;

        Ok(Self::new(
            scheme,
            authority.host(),
            authority.port_u16(),
            uri.path(),
            uri.query().unwrap_or_default(),
        ))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, `None` meaning the default for the scheme.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Explicit port, or 80/443 for `http`/`https`.
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or(match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw, undecoded query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Decoded query parameters in source order. Keys may repeat.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Path segments after removing exactly one leading `/`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path
            .strip_prefix('/')
            .unwrap_or(&self.path)
            .split('/')
    }

    /// Copy of this request pointing at another path, query untouched.
    pub fn with_path(&self, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if path.is_empty() {
            path.push('/');
        }
        Self {
            path,
            ..self.clone()
        }
    }
}

fn parse_query(query_string: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query_string.as_bytes())
        .into_owned()
        .collect()
}
