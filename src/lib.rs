//! Siteaccess router library.
//!
//! Resolves which named site a request belongs to, strips the
//! site-identifying part of its path and normalizes the request through a
//! priority-ordered pipeline before it reaches the content layer.

pub mod config;
pub mod http;
pub mod kernel;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod routing;

pub use config::schema::AppConfig;
pub use http::{HttpServer, Request};
pub use kernel::{FrontController, Kernel, RequestType};
pub use lifecycle::Shutdown;
pub use routing::{Router, SiteAccess};
