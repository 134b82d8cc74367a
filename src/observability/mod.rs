//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the HTTP layer into every request span
//! - Recording a metric without an installed recorder is a no-op

pub mod logging;
pub mod metrics;

use thiserror::Error;

/// Errors raised while installing logging or metrics.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("invalid log filter: {0}")]
    LoggingInit(String),

    #[error("invalid metrics address: {0}")]
    InvalidAddress(String),

    #[error("metrics recorder installation failed: {0}")]
    MetricsInit(String),
}
