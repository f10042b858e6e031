// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end HTTP testing.
//!
//! `TestHarness` opens a temp SQLite store, binds the gateway on
//! `127.0.0.1:0`, and serves it from a background task. Dropping the harness
//! cancels the server and removes the database.

use std::sync::Arc;

use serde_json::Value;
use sudokube_config::model::StorageConfig;
use sudokube_core::{StorageAdapter, SudokubeError};
use sudokube_gateway::{GatewayState, ServerConfig, build_router, serve};
use sudokube_storage::SqliteStorage;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    server: ServerConfig,
    wal_mode: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            server: ServerConfig::default(),
            wal_mode: true,
        }
    }

    /// Replace the allowed CORS origins.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.server.allowed_origins = origins;
        self
    }

    /// Set the request body limit.
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.server.max_body_bytes = limit;
        self
    }

    /// Use rollback-journal mode instead of WAL.
    pub fn without_wal(mut self) -> Self {
        self.wal_mode = false;
        self
    }

    /// Build the harness and start serving.
    pub async fn build(self) -> Result<TestHarness, SudokubeError> {
        let temp_dir = tempfile::TempDir::new().map_err(SudokubeError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: self.wal_mode,
        });
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| SudokubeError::Server {
                message: format!("failed to bind test listener: {e}"),
                source: Some(Box::new(e)),
            })?;
        let addr = listener.local_addr().map_err(|e| SudokubeError::Server {
            message: format!("test listener has no address: {e}"),
            source: Some(Box::new(e)),
        })?;

        let shutdown = CancellationToken::new();
        let router = build_router(GatewayState::new(storage.clone()), &self.server);
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(listener, router, server_shutdown).await {
                tracing::error!(error = %e, "test server exited with error");
            }
        });

        Ok(TestHarness {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            storage,
            shutdown,
            _temp_dir: temp_dir,
        })
    }
}

/// A running gateway backed by a temp database.
pub struct TestHarness {
    /// `http://127.0.0.1:<port>`, no trailing slash.
    pub base_url: String,
    /// Shared HTTP client.
    pub client: reqwest::Client,
    /// The store the server writes to, for direct assertions.
    pub storage: Arc<dyn StorageAdapter>,
    shutdown: CancellationToken,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body to `/api/sudoku`.
    pub async fn post_sudoku(&self, body: &Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(self.url("/api/sudoku"))
            .json(body)
            .send()
            .await
    }

    /// POST raw bytes to `/api/sudoku` with a JSON content type.
    pub async fn post_raw(&self, body: impl Into<reqwest::Body>) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(self.url("/api/sudoku"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
    }

    /// GET `path` relative to the server root.
    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(self.url(path)).send().await
    }

    /// Stop the server. In-flight requests are drained.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{CLASSIC_PUZZLE, body, classic_grid};

    #[tokio::test]
    async fn harness_serves_health() {
        let harness = TestHarness::builder().build().await.unwrap();
        let resp = harness.get("/health").await.unwrap();
        assert!(resp.status().is_success());
    }

    #[tokio::test]
    async fn harness_exposes_the_served_store() {
        let harness = TestHarness::builder().without_wal().build().await.unwrap();
        let resp = harness.post_sudoku(&body(classic_grid())).await.unwrap();
        assert!(resp.status().is_success());

        let records = harness.storage.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].solved_puzzle.as_str(), CLASSIC_PUZZLE);
    }

    #[tokio::test]
    async fn stop_refuses_new_connections() {
        let harness = TestHarness::builder().build().await.unwrap();
        harness.stop();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(harness.get("/health").await.is_err());
    }
}
