//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → request.rs (project head into the pipeline request model)
//!     → kernel (siteaccess binding, pipeline, rendering)
//!     → response.rs (redirect and text helpers)
//!     → Send to client
//! ```

pub mod request;
pub mod request_id;
pub mod response;
pub mod server;

pub use request::{Request, RequestAttributes, RequestError};
pub use request_id::{MakeRequestUuid, X_REQUEST_ID};
pub use server::HttpServer;
