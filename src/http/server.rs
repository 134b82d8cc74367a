//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with a catch-all handler
//! - Wire up middleware (timeout, concurrency limit, request ID, tracing)
//! - Dispatch requests to the front controller
//! - Swap the front controller on configuration reload
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::request::Request;
use crate::http::request_id::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response;
use crate::kernel::{FrontController, Kernel, RequestType};
use crate::observability::metrics;
use crate::routing::MatcherError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ArcSwap<FrontController>>,
}

/// HTTP front end for the siteaccess router.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
    controller: Arc<ArcSwap<FrontController>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, MatcherError> {
        let controller = Arc::new(ArcSwap::from_pointee(FrontController::from_config(&config)?));
        let state = AppState {
            controller: controller.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            controller,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live front controller.
    pub fn controller(&self) -> Arc<ArcSwap<FrontController>> {
        self.controller.clone()
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Every configuration received on `config_updates` replaces the front
    /// controller; one that fails to compile is logged and ignored.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let controller = self.controller.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match FrontController::from_config(&config) {
                    Ok(next) => {
                        controller.store(Arc::new(next));
                        tracing::info!("Front controller reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Reloaded configuration rejected, keeping current one");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Catch-all handler: project the request and hand it to the kernel.
async fn dispatch(State(state): State<AppState>, request: axum::extract::Request) -> Response {
    let start = Instant::now();
    let (parts, _body) = request.into_parts();
    let method = parts.method.to_string();

    let response = match Request::from_parts(&parts) {
        Ok(request) => {
            let controller = state.controller.load();
            match controller.handle(request, RequestType::Main) {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, "Dispatch failed");
                    response::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed request");
            response::text(StatusCode::BAD_REQUEST, e.to_string())
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
