// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. `Database` is the single writer: query modules take `&Database`
//! and go through [`Database::connection`]. Do NOT open additional
//! connections for writes.

use std::path::Path;
use std::time::Duration;

use sudokube_core::SudokubeError;
use tracing::debug;

use crate::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a tokio-rusqlite error into [`SudokubeError::StorageUnavailable`].
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SudokubeError {
    SudokubeError::storage(e)
}

/// Handle to the SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, SudokubeError> {
        Self::open_with(path, true).await
    }

    /// Open the database, choosing the journal mode.
    ///
    /// Missing parent directories are created. `:memory:` is accepted.
    pub async fn open_with(path: &str, wal_mode: bool) -> Result<Self, SudokubeError> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(SudokubeError::storage)?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(SudokubeError::storage)?;

        let journal_mode = conn
            .call(move |conn| -> Result<String, rusqlite::Error> {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                let mode = if wal_mode { "WAL" } else { "DELETE" };
                let applied: String =
                    conn.query_row(&format!("PRAGMA journal_mode = {mode}"), [], |row| {
                        row.get(0)
                    })?;
                conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA synchronous = NORMAL;")?;
                Ok(applied)
            })
            .await
            .map_err(map_tr_err)?;

        conn.call(|conn| -> Result<(), refinery::Error> { migrations::run_migrations(conn) })
            .await
            .map_err(SudokubeError::storage)?;

        debug!(path, journal_mode = %journal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The serialized connection all queries go through.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), SudokubeError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    /// Checkpoint and close the connection.
    pub async fn close(self) -> Result<(), SudokubeError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(SudokubeError::storage)
    }
}
