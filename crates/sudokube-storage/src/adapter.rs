// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use sudokube_config::model::StorageConfig;
use sudokube_core::{
    CanonicalPuzzle, HealthStatus, PluginAdapter, StorageAdapter, SudokuRecord, SudokubeError,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed record store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, SudokubeError> {
        self.db.get().ok_or_else(|| {
            SudokubeError::storage("storage not initialized -- call initialize() first")
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, SudokubeError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".to_string()));
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await;
        match probe {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), SudokubeError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SudokubeError> {
        let path = &self.config.database_path;
        let db = Database::open_with(path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| SudokubeError::storage("storage already initialized"))?;
        info!(path = %path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SudokubeError> {
        self.db()?.checkpoint().await
    }

    async fn append(&self, puzzle: &CanonicalPuzzle) -> Result<SudokuRecord, SudokubeError> {
        let record = queries::sudokus::append(self.db()?, puzzle).await?;
        debug!(id = record.id, solved_at = %record.solved_at, "record appended");
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<SudokuRecord>, SudokubeError> {
        queries::sudokus::list(self.db()?).await
    }

    async fn get(&self, id: i64) -> Result<Option<SudokuRecord>, SudokubeError> {
        queries::sudokus::get(self.db()?, id).await
    }

    async fn count(&self) -> Result<u64, SudokubeError> {
        queries::sudokus::count(self.db()?).await
    }
}
