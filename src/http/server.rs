//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router whose fallback resolves every request against the site
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener, stop on the shutdown signal
//! - Map dispatch outcomes to status codes (200 / 405 / 404)
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::observability::metrics;
use crate::routing::{Dispatch, PathRequest};
use crate::site::{RouteValue, Site};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
}

/// Body of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub route: RouteValue,
    /// Canonical path rendered back from the route value.
    pub path: Option<String>,
}

/// HTTP server exposing a site's route resolution.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server for the given site.
    pub fn new(site: Arc<Site>, config: &ServerConfig) -> Self {
        let state = AppState { site };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered application, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Resolve the request path and report the outcome.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let path_request = PathRequest::from(&request);
    let outcome = state.site.resolve(&path_request);

    metrics::record_dispatch(outcome.outcome(), request.method(), start);

    let request_id = request.request_id();
    let path = request.uri().path();

    match outcome {
        Dispatch::Matched { route, method_ok: true } => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                route = %route.qualified_name(),
                "Route matched"
            );
            let path = state.site.render(&route);
            (StatusCode::OK, Json(RouteResponse { route, path })).into_response()
        }
        Dispatch::Matched { route, method_ok: false } => {
            tracing::debug!(
                request_id = %request_id,
                method = %request.method(),
                route = %route.qualified_name(),
                "Method not allowed"
            );
            (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
        }
        Dispatch::NotFound => {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
    }
}
