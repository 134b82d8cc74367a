//! Shared fixtures for integration tests.

#![allow(dead_code)]

use siteaccess_router::config::{parse_config, AppConfig};
use siteaccess_router::routing::Router;

/// URIElement(2), then MapURI, then MapHost, falling back to `default_sa`.
pub const ELEMENT_URI_HOST: &str = r#"
[siteaccess]
default = "default_sa"

[[siteaccess.match]]
type = "URIElement"
value = 2

[[siteaccess.match]]
type = "MapURI"
map = { first_sa = "first_sa", second_sa = "second_sa" }

[[siteaccess.match]]
type = "MapHost"
map = { first_sa = "first_sa", first_siteaccess = "first_sa" }
"#;

/// MapURI siteaccesses with index pages and a setup siteaccess.
pub const SITE: &str = r#"
[siteaccess]
default = "setup"
index_page = "/home"

[[siteaccess.match]]
type = "MapURI"
map = { fr = "fre", en = "eng" }

[[siteaccess.match]]
type = "Compound"
name = "shop_dev"

[[siteaccess.match.matchers]]
type = "MapHost"
map = { "shop.example.com" = "shop" }

[[siteaccess.match.matchers]]
type = "MapPort"
map = { "8080" = "dev" }

[siteaccess.settings.fre]
index_page = "accueil"

[routes]
login = "/user/login"
"#;

pub fn config(source: &str) -> AppConfig {
    parse_config(source).expect("fixture config must be valid")
}

pub fn router(source: &str) -> Router {
    Router::from_config(&config(source).siteaccess).expect("fixture matchers must compile")
}
