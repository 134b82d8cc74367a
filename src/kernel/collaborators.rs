//! Narrow interfaces to the layers around the pipeline.

use std::collections::BTreeMap;

use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;

use crate::config::schema::{AppConfig, SiteAccessConfig};
use crate::http::{response, Request};
use crate::kernel::DispatchError;

/// Per-siteaccess configuration values.
pub trait ConfigResolver: Send + Sync {
    /// Path served for the site root of `siteaccess`.
    fn index_page(&self, siteaccess: Option<&str>) -> Option<String>;
}

/// [`ConfigResolver`] backed by the `[siteaccess]` configuration section.
#[derive(Debug, Clone, Default)]
pub struct SettingsResolver {
    global_index_page: Option<String>,
    index_pages: BTreeMap<String, String>,
}

impl SettingsResolver {
    pub fn from_config(config: &SiteAccessConfig) -> Self {
        Self {
            global_index_page: config.index_page.clone(),
            index_pages: config
                .settings
                .iter()
                .filter_map(|(name, s)| Some((name.clone(), s.index_page.clone()?)))
                .collect(),
        }
    }

    pub fn with_index_page(mut self, index_page: impl Into<String>) -> Self {
        self.global_index_page = Some(index_page.into());
        self
    }
}

impl ConfigResolver for SettingsResolver {
    fn index_page(&self, siteaccess: Option<&str>) -> Option<String> {
        siteaccess
            .and_then(|name| self.index_pages.get(name))
            .or(self.global_index_page.as_ref())
            .cloned()
    }
}

/// Routing context of the active request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingContext {
    pub base_url: String,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
}

impl RoutingContext {
    pub fn from_request(request: &Request) -> Self {
        Self {
            base_url: request.base_url.clone(),
            scheme: request.uri().scheme().to_string(),
            host: request.uri().host().to_string(),
            port: request.uri().port(),
        }
    }
}

/// Generates URLs for named routes.
pub trait UrlGenerator: Send + Sync {
    fn generate(&self, route: &str, context: &RoutingContext) -> Result<String, DispatchError>;
}

/// Name of the setup wizard route; its path comes from `[setup] path`.
pub const SETUP_ROUTE: &str = "setup";

/// Static route table producing base-url relative paths.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes from `[routes]` plus the setup route.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut table = Self {
            routes: config.routes.clone(),
        };
        table
            .routes
            .insert(SETUP_ROUTE.to_string(), config.setup.path.clone());
        table
    }

    pub fn with_route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(name.into(), path.into());
        self
    }
}

impl UrlGenerator for RouteTable {
    fn generate(&self, route: &str, context: &RoutingContext) -> Result<String, DispatchError> {
        let path = self
            .routes
            .get(route)
            .ok_or_else(|| DispatchError::RouteNotFound(route.to_string()))?;
        Ok(format!("{}{}", context.base_url, path))
    }
}

/// The content layer a request reaches when no stage answered it.
pub trait ContentRenderer: Send + Sync {
    fn render(&self, request: &Request) -> Result<Response, DispatchError>;
}

/// Echoes the resolved siteaccess and semantic path as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticRenderer;

/// Header naming the siteaccess a response was rendered for.
pub const X_SITEACCESS: &str = "x-siteaccess";

impl ContentRenderer for DiagnosticRenderer {
    fn render(&self, request: &Request) -> Result<Response, DispatchError> {
        let siteaccess = request.siteaccess_name().unwrap_or_default();
        let semantic = request
            .attributes
            .semantic_pathinfo
            .as_deref()
            .unwrap_or_else(|| request.path());

        let mut response = response::text(
            StatusCode::OK,
            format!("siteaccess: {siteaccess}\nsemantic path: {semantic}\n"),
        );
        let value: HeaderValue = siteaccess
            .parse()
            .map_err(|_| DispatchError::Render(format!("invalid siteaccess name `{siteaccess}`")))?;
        response.headers_mut().insert(X_SITEACCESS, value);
        Ok(response)
    }
}
