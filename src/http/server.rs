//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener with graceful shutdown
//! - Answer every request with a redirect or the not-found response

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RedirectConfig;
use crate::http::request::{
    propagate_request_id_layer, request_id, request_target, set_request_id_layer,
};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::Redirector;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub redirector: Arc<Redirector>,
    pub status: StatusCode,
    pub not_found_body: Arc<str>,
}

/// Front HTTP server: redirects matched requests, 404s the rest.
pub struct HttpServer {
    router: Router,
    config: RedirectConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RedirectConfig, redirector: Arc<Redirector>) -> Self {
        let status = StatusCode::from_u16(config.redirect.status)
            .ok()
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::FOUND);

        let state = AppState {
            redirector,
            status,
            not_found_body: Arc::from(config.redirect.not_found_body.as_str()),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer());

        Router::new()
            .fallback(redirect_handler)
            .with_state(state)
            .layer(middleware)
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        serve(listener, self.router, shutdown).await
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectConfig {
        &self.config
    }
}

/// Serve `router` on `listener` until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!(address = %addr, "HTTP server stopped");
    Ok(())
}

/// Looks up the request's path + query and redirects on a match.
async fn redirect_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let target = request_target(request.uri());

    match state.redirector.resolve(target) {
        Some(destination) => {
            tracing::debug!(
                request_id = %request_id(&request),
                target = %target,
                destination = %destination,
                "Redirecting"
            );
            metrics::record_request("redirect", start_time);
            response::redirect(state.status, &destination)
        }
        None => {
            tracing::debug!(request_id = %request_id(&request), target = %target, "No redirect rule matched");
            metrics::record_request("miss", start_time);
            response::not_found(&state.not_found_body)
        }
    }
}
