//! Request normalization and rewrite pipeline.
//!
//! # Data Flow
//! ```text
//! Request with siteaccess + semanticPathinfo bound
//!     → setup.rs    (190) redirect to the setup wizard
//!     → index.rs    (40)  root → index page, flag needsForward
//!     → forward.rs  (10)  re-dispatch on semanticPathinfo
//!     → redirect.rs (0)   301 to semanticPathinfo (+ siteaccess prefix)
//!     → Return: terminal response, or continue to rendering
//! ```
//!
//! # Design Decisions
//! - Higher priority runs first; equal priorities keep registration order
//! - Stage state lives only in the request attributes
//! - The first terminal outcome stops the pipeline

pub mod forward;
pub mod index;
pub mod redirect;
pub mod setup;

use std::sync::Arc;

use axum::response::Response;

use crate::http::Request;
use crate::kernel::{ConfigResolver, DispatchError, Kernel, RequestType, UrlGenerator};
use crate::observability::metrics;

pub use forward::ForwardStage;
pub use index::IndexStage;
pub use redirect::RedirectStage;
pub use setup::SetupStage;

/// One request travelling through the pipeline.
///
/// The kernel is the active request context. Events built without one
/// (batch or offline resolution) make the context-bound stages no-ops.
pub struct RequestEvent<'k> {
    request: Request,
    request_type: RequestType,
    kernel: Option<&'k dyn Kernel>,
}

impl<'k> RequestEvent<'k> {
    pub fn new(request: Request, request_type: RequestType) -> Self {
        Self {
            request,
            request_type,
            kernel: None,
        }
    }

    pub fn with_kernel(mut self, kernel: &'k dyn Kernel) -> Self {
        self.kernel = Some(kernel);
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    pub fn is_main_request(&self) -> bool {
        self.request_type == RequestType::Main
    }

    pub fn kernel(&self) -> Option<&'k dyn Kernel> {
        self.kernel
    }
}

/// What a stage decided.
#[derive(Debug)]
pub enum StageOutcome {
    /// Nothing to do for this request.
    Continue,
    /// Attributes were rewritten; later stages still run.
    Mutated,
    /// The request is answered; no further stage runs.
    Respond(Response),
}

/// A single pipeline stage.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Higher runs earlier.
    fn priority(&self) -> i32;

    fn handle(&self, event: &mut RequestEvent<'_>) -> Result<StageOutcome, DispatchError>;
}

/// Priority-ordered stages.
#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new(mut stages: Vec<Arc<dyn Stage>>) -> Self {
        // Stable: equal priorities keep registration order
        stages.sort_by_key(|stage| std::cmp::Reverse(stage.priority()));
        Self { stages }
    }

    /// Setup, Index, Forward and Redirect with their fixed priorities.
    pub fn standard(
        config: Arc<dyn ConfigResolver>,
        urls: Arc<dyn UrlGenerator>,
        setup_siteaccess: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            Arc::new(SetupStage::new(setup_siteaccess, urls)),
            Arc::new(ForwardStage),
            Arc::new(RedirectStage),
            Arc::new(IndexStage::new(config)),
        ])
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run the stages until one responds.
    ///
    /// Returns `None` when the request should continue to rendering.
    pub fn process(&self, event: &mut RequestEvent<'_>) -> Result<Option<Response>, DispatchError> {
        for stage in &self.stages {
            match stage.handle(event)? {
                StageOutcome::Continue => {}
                StageOutcome::Mutated => {
                    tracing::debug!(
                        stage = stage.name(),
                        semantic_pathinfo = ?event.request().attributes.semantic_pathinfo,
                        "Request attributes rewritten"
                    );
                }
                StageOutcome::Respond(response) => {
                    tracing::debug!(
                        stage = stage.name(),
                        status = %response.status(),
                        "Pipeline produced a terminal response"
                    );
                    metrics::record_terminal_stage(stage.name());
                    return Ok(Some(response));
                }
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
