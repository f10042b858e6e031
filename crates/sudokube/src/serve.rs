// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sudokube serve` command implementation.
//!
//! Opens the SQLite record store, starts the HTTP gateway, and waits for
//! SIGINT/SIGTERM. On shutdown in-flight requests are drained and the store
//! is checkpointed before the process exits.

use std::sync::Arc;

use sudokube_config::SudokubeConfig;
use sudokube_core::{StorageAdapter, SudokubeError};
use sudokube_gateway::{GatewayState, ServerConfig, start_server};
use sudokube_storage::SqliteStorage;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

/// Run the `sudokube serve` command.
pub async fn run_serve(config: SudokubeConfig) -> Result<(), SudokubeError> {
    init_tracing(&config.logging.level);
    let cancel = shutdown::install_signal_handler();
    serve_until(&config, cancel).await
}

/// Open storage, serve until `shutdown` is cancelled, then close storage.
///
/// Storage is closed even when the server fails.
pub async fn serve_until(
    config: &SudokubeConfig,
    shutdown: CancellationToken,
) -> Result<(), SudokubeError> {
    info!(version = env!("CARGO_PKG_VERSION"), "starting sudokube");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let state = GatewayState::new(storage.clone());
    let result = start_server(&server_config(config), state, shutdown).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    info!("sudokube stopped");
    result
}

/// Gateway settings from the `[server]` and `[cors]` sections.
pub fn server_config(config: &SudokubeConfig) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_body_bytes: config.server.max_body_bytes,
        allowed_origins: config.cors.allowed_origins.clone(),
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `logging.level`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("sudokube={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn temp_config(dir: &tempfile::TempDir) -> SudokubeConfig {
        let mut config = SudokubeConfig::default();
        config.server.port = 0;
        config.storage.database_path = dir
            .path()
            .join("data/serve.db")
            .to_string_lossy()
            .to_string();
        config
    }

    #[test]
    fn server_config_copies_sections() {
        let mut config = SudokubeConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 7000;
        config.server.max_body_bytes = 2048;
        config.cors.allowed_origins = vec!["https://grid.example.com".to_string()];

        let server = server_config(&config);
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 7000);
        assert_eq!(server.max_body_bytes, 2048);
        assert_eq!(server.allowed_origins, vec!["https://grid.example.com"]);
    }

    #[test]
    #[serial]
    #[allow(unsafe_code)]
    fn env_overrides_reach_server_config() {
        // SERIAL TEST: modifies environment variables
        unsafe { std::env::set_var("SUDOKUBE_SERVER_PORT", "6200") };
        let loaded = sudokube_config::load_and_validate();
        unsafe { std::env::remove_var("SUDOKUBE_SERVER_PORT") };

        let config = loaded.expect("env override should validate");
        assert_eq!(server_config(&config).port, 6200);
    }

    #[tokio::test]
    async fn serve_until_returns_after_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);
        let token = CancellationToken::new();
        token.cancel();

        serve_until(&config, token).await.unwrap();
        assert!(dir.path().join("data/serve.db").exists());
    }

    #[tokio::test]
    async fn serve_until_reports_bind_failure() {
        let dir = tempfile::tempdir().unwrap();
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = temp_config(&dir);
        config.server.port = taken.local_addr().unwrap().port();

        let err = serve_until(&config, CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SudokubeError::Server { .. }));
    }
}
