//! Request handling entry point.
//!
//! # Data Flow
//! ```text
//! Request (from transport or an internal forward)
//!     → front.rs (bind siteaccess, compute semanticPathinfo)
//!     → pipeline (Setup → Index → Forward → Redirect)
//!     → terminal response, or collaborators.rs ContentRenderer
//! ```
//!
//! # Design Decisions
//! - Handling is synchronous; an internal forward is a nested call
//! - Collaborators (configuration, URL generation, rendering) are traits
//! - Dispatch errors propagate unchanged through forwards

pub mod collaborators;
pub mod front;

use axum::response::Response;
use thiserror::Error;

use crate::http::Request;

pub use collaborators::{
    ConfigResolver, ContentRenderer, DiagnosticRenderer, RouteTable, RoutingContext,
    SettingsResolver, UrlGenerator,
};
pub use front::FrontController;

/// Whether a request came from the transport or from inside the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Main,
    Sub,
}

/// Errors raised while dispatching a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("route `{0}` is not defined")]
    RouteNotFound(String),

    #[error("content rendering failed: {0}")]
    Render(String),

    #[error("invalid response: {0}")]
    Response(#[from] axum::http::Error),
}

/// The handling entry point shared by top-level requests and forwards.
pub trait Kernel: Send + Sync {
    fn handle(&self, request: Request, request_type: RequestType) -> Result<Response, DispatchError>;
}
