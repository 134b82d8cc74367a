//! Siteaccess routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (scheme, host, port, path, query)
//!     → request.rs (NormalizedRequest projection)
//!     → router.rs (iterate matchers in declaration order)
//!     → matcher.rs (evaluate one strategy)
//!     → Return: SiteAccess (matched or default)
//!
//! Matcher compilation (at startup):
//!     [[siteaccess.match]] specs
//!     → validate parameters
//!     → freeze as immutable Router
//!
//! Path rewriting (lexer.rs):
//!     analyse_uri: /first_sa/foo → /foo
//!     analyse_link: /foo → /first_sa/foo
//! ```
//!
//! # Design Decisions
//! - Matchers compiled at startup, immutable at runtime
//! - Consecutive slashes are significant when segmenting paths
//! - First match wins; no match resolves to the default siteaccess

pub mod lexer;
pub mod matcher;
pub mod request;
pub mod router;
pub mod siteaccess;

pub use lexer::UriLexer;
pub use matcher::{Matcher, MatcherError};
pub use request::{NormalizedRequest, UrlError};
pub use router::Router;
pub use siteaccess::{MatchingType, SiteAccess};
