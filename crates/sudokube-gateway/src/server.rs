// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sudokube_core::{StorageAdapter, SudokubeError};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The record store every handler reads from and appends to.
    pub storage: Arc<dyn StorageAdapter>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration.
///
/// Mirrors the `[server]` and `[cors]` sections of the config file without
/// depending on the config crate.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind. 0 lets the OS choose.
    pub port: u16,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
    /// Browser origins allowed to call the API.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_body_bytes: 64 * 1024,
            allowed_origins: vec!["http://localhost:8080".to_string()],
        }
    }
}

/// Build the API router:
/// - GET /health
/// - POST /api/sudoku
/// - GET /api/sudoku
/// - GET /api/sudoku/{id}
pub fn build_router(state: GatewayState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/api/sudoku",
            get(handlers::list_sudokus).post(handlers::post_sudoku),
        )
        .route("/api/sudoku/{id}", get(handlers::get_sudoku))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer restricted to the configured origins.
///
/// Browsers send the origin without a trailing slash, so one is stripped from
/// each configured entry. Entries that are not valid header values are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            let trimmed = origin.trim_end_matches('/');
            match HeaderValue::from_str(trimmed) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(%origin, error = %e, "ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Serve `router` on an already-bound listener until `shutdown` is cancelled.
///
/// In-flight requests are drained before this returns.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
) -> Result<(), SudokubeError> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| SudokubeError::Server {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })
}

/// Bind to the configured host:port and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), SudokubeError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| SudokubeError::Server {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    info!(addr = %local, "gateway listening");

    serve(listener, build_router(state, config), shutdown).await?;
    info!("gateway stopped");
    Ok(())
}
