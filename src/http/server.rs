//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request ID, request timeout)
//! - Build the shared application state from config
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProductPageConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::session::{self, SessionKeyError};
use crate::http::{api, pages};
use crate::observability::Metrics;
use crate::services::{Aggregator, DownstreamClient, Topology};

/// Body of `/health`.
pub const HEALTH_BODY: &str = "Product page is healthy";

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    SessionKey(#[from] SessionKeyError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub metrics: Metrics,
    pub cookie_key: Key,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// HTTP server for the product page.
pub struct HttpServer {
    router: Router,
    config: ProductPageConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProductPageConfig) -> Result<Self, ServerError> {
        let metrics = Metrics::new();
        let topology = Arc::new(Topology::from_config(&config.services));
        let client = DownstreamClient::new(
            Duration::from_secs(config.timeouts.downstream_secs),
            metrics.clone(),
        )?;

        let state = AppState {
            aggregator: Aggregator::new(client, topology, config.flood_factor),
            metrics,
            cookie_key: session::session_key(&config.session)?,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers, outermost first.
    fn build_router(config: &ProductPageConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(pages::index))
            .route("/index.html", get(pages::index))
            .route("/health", get(health))
            .route("/login", post(session::login))
            .route("/logout", get(session::logout))
            .route("/productpage", get(pages::product_page))
            .route("/api/v1/products", get(api::products))
            .route("/api/v1/products/{id}", get(api::product))
            .route("/api/v1/products/{id}/reviews", get(api::reviews))
            .route("/api/v1/products/{id}/ratings", get(api::ratings))
            .route("/metrics", get(metrics))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        Duration::from_secs(config.timeouts.request_secs),
                    )),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            flood_factor = self.config.flood_factor,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> &'static str {
    HEALTH_BODY
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
