//! Request model consumed by the pipeline.
//!
//! # Responsibilities
//! - Extract routing-relevant information (scheme, host, port, path, query)
//! - Carry cookies and headers across an internal forward
//! - Hold the pipeline-scoped attribute set
//!
//! # Design Decisions
//! - Well-known attributes are typed fields so stage preconditions are
//!   checked by the compiler
//! - Only arbitrary upstream attributes go through the generic `extra` map
//! - The original request is never mutated into a forward; a copy is built

use std::collections::BTreeMap;

use axum::http::{header, request::Parts, uri::Authority, HeaderMap, HeaderValue, Method};
use thiserror::Error;

use crate::routing::{NormalizedRequest, SiteAccess, UrlError};

/// Errors raised while projecting a transport request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request has no host")]
    MissingHost,

    #[error("invalid host `{0}`")]
    InvalidHost(String),

    #[error(transparent)]
    InvalidUrl(#[from] UrlError),
}

/// Pipeline-scoped request attributes.
///
/// A request's progress through the pipeline is exactly this set; there is
/// no separate state object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestAttributes {
    /// Path with the siteaccess prefix removed.
    pub semantic_pathinfo: Option<String>,

    /// Set when the request must be re-dispatched internally.
    pub needs_forward: bool,

    /// Set when the request must be answered with a permanent redirect.
    pub needs_redirect: bool,

    /// Re-insert the siteaccess prefix into the redirect target.
    pub prepend_siteaccess_on_redirect: bool,

    /// Siteaccess bound to this request.
    pub siteaccess: Option<SiteAccess>,

    /// Arbitrary upstream attributes, preserved across a forward.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RequestAttributes {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.extra.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}

/// An inbound or internally forwarded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    uri: NormalizedRequest,

    /// Prefix the application is mounted under (empty at the web root).
    pub base_url: String,

    pub headers: HeaderMap,
    pub cookies: BTreeMap<String, String>,
    pub attributes: RequestAttributes,
}

impl Request {
    pub fn new(method: Method, uri: NormalizedRequest) -> Self {
        Self {
            method,
            uri,
            base_url: String::new(),
            headers: HeaderMap::new(),
            cookies: BTreeMap::new(),
            attributes: RequestAttributes::default(),
        }
    }

    /// A `GET` request for an absolute URL.
    pub fn create(url: &str) -> Result<Self, RequestError> {
        Ok(Self::new(Method::GET, NormalizedRequest::from_url(url)?))
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Project the head of a transport request.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority, and must be a bare `host[:port]`. Path and query are
    /// taken from the request target as sent. The scheme defaults to `http`
    /// when the URI carries none.
    pub fn from_parts(parts: &Parts) -> Result<Self, RequestError> {
        let authority = match parts.headers.get(header::HOST) {
            Some(value) => parse_host(value)?,
            None => parts.uri.authority().cloned().ok_or(RequestError::MissingHost)?,
        };
        if authority.host().is_empty() || authority.as_str().contains('@') {
            return Err(RequestError::InvalidHost(authority.to_string()));
        }

        let uri = NormalizedRequest::new(
            parts.uri.scheme_str().unwrap_or("http"),
            authority.host(),
            authority.port_u16(),
            parts.uri.path(),
            parts.uri.query().unwrap_or_default(),
        );
        let mut request = Self::new(parts.method.clone(), uri);
        request.cookies = parse_cookies(&parts.headers);
        request.headers = parts.headers.clone();
        Ok(request)
    }

    pub fn uri(&self) -> &NormalizedRequest {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query_string(&self) -> &str {
        self.uri.query_string()
    }

    /// The bound siteaccess name, if any.
    pub fn siteaccess_name(&self) -> Option<&str> {
        self.attributes.siteaccess.as_ref().map(|sa| sa.name())
    }

    /// Copy of this request pointing at `path`.
    ///
    /// Method, headers, cookies, query and attributes are carried over.
    pub fn duplicate_with_path(&self, path: &str) -> Self {
        Self {
            uri: self.uri.with_path(path),
            ..self.clone()
        }
    }
}

fn parse_host(value: &HeaderValue) -> Result<Authority, RequestError> {
    let invalid = || RequestError::InvalidHost(String::from_utf8_lossy(value.as_bytes()).into_owned());
    let raw = value.to_str().map_err(|_| invalid())?;
    if raw.is_empty() {
        return Err(RequestError::MissingHost);
    }
    raw.parse::<Authority>().map_err(|_| invalid())
}

fn parse_cookies(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
