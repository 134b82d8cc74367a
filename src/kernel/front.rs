//! Front controller: siteaccess binding, pipeline, rendering.
//!
//! # Responsibilities
//! - Bind the siteaccess and semantic path of every request exactly once
//! - Run the stage pipeline with itself as the active request context
//! - Hand unanswered requests to the content renderer
//!
//! # Design Decisions
//! - A request that already carries a siteaccess (an internal forward) is
//!   not matched again
//! - Offline resolution runs the same pipeline without a request context

use std::sync::Arc;

use axum::response::Response;

use crate::config::schema::AppConfig;
use crate::http::Request;
use crate::kernel::{
    ContentRenderer, DiagnosticRenderer, DispatchError, Kernel, RequestType, RouteTable,
    SettingsResolver,
};
use crate::pipeline::{Pipeline, RequestEvent};
use crate::routing::{MatcherError, Router};

/// Outcome of resolving a request without a request context.
#[derive(Debug)]
pub struct Resolution {
    /// The request with its final attributes.
    pub request: Request,

    /// Response produced by a pipeline stage, if any.
    pub response: Option<Response>,
}

/// The [`Kernel`] serving transport requests and internal forwards.
pub struct FrontController {
    router: Arc<Router>,
    pipeline: Pipeline,
    renderer: Arc<dyn ContentRenderer>,
}

impl FrontController {
    pub fn new(router: Arc<Router>, pipeline: Pipeline, renderer: Arc<dyn ContentRenderer>) -> Self {
        Self {
            router,
            pipeline,
            renderer,
        }
    }

    /// Wire the router, the standard pipeline and the diagnostic renderer.
    pub fn from_config(config: &AppConfig) -> Result<Self, MatcherError> {
        let router = Router::from_config(&config.siteaccess)?;
        let pipeline = Pipeline::standard(
            Arc::new(SettingsResolver::from_config(&config.siteaccess)),
            Arc::new(RouteTable::from_config(config)),
            config.setup.siteaccess.clone(),
        );

        Ok(Self::new(
            Arc::new(router),
            pipeline,
            Arc::new(DiagnosticRenderer),
        ))
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Bind siteaccess and semantic path unless already present.
    pub fn bind(&self, request: &mut Request) {
        if request.attributes.siteaccess.is_none() {
            let siteaccess = self.router.match_request(request.uri());
            request.attributes.siteaccess = Some(siteaccess);
        }
        if request.attributes.semantic_pathinfo.is_none() {
            let semantic = match &request.attributes.siteaccess {
                Some(siteaccess) => siteaccess.analyse_uri(request.path()),
                None => request.path().to_string(),
            };
            request.attributes.semantic_pathinfo = Some(semantic);
        }
    }

    /// Bind and run the pipeline without a request context.
    ///
    /// Setup and Forward stay inert; Index and Redirect behave as usual.
    pub fn resolve(&self, mut request: Request) -> Result<Resolution, DispatchError> {
        self.bind(&mut request);
        let mut event = RequestEvent::new(request, RequestType::Main);
        let response = self.pipeline.process(&mut event)?;
        Ok(Resolution {
            request: event.into_request(),
            response,
        })
    }
}

impl Kernel for FrontController {
    fn handle(&self, mut request: Request, request_type: RequestType) -> Result<Response, DispatchError> {
        self.bind(&mut request);

        let mut event = RequestEvent::new(request, request_type).with_kernel(self);
        if let Some(response) = self.pipeline.process(&mut event)? {
            return Ok(response);
        }
        self.renderer.render(event.request())
    }
}

impl std::fmt::Debug for FrontController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontController")
            .field("router", &self.router)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
