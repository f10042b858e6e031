// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the append-only puzzle record table.

use async_trait::async_trait;

use crate::error::SudokubeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CanonicalPuzzle, SudokuRecord};

/// Adapter for the record store.
///
/// Records are append-only: there is no update or delete. Every failure of
/// the backing store surfaces as [`SudokubeError::StorageUnavailable`].
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and applies pending migrations.
    async fn initialize(&self) -> Result<(), SudokubeError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), SudokubeError>;

    /// Stores a puzzle stamped with the current UTC time and returns the
    /// record including its store-assigned id.
    async fn append(&self, puzzle: &CanonicalPuzzle) -> Result<SudokuRecord, SudokubeError>;

    /// Returns every record in insertion order. Each call reads afresh.
    async fn list(&self) -> Result<Vec<SudokuRecord>, SudokubeError>;

    /// Looks up a single record by id.
    async fn get(&self, id: i64) -> Result<Option<SudokuRecord>, SudokubeError>;

    /// Number of stored records.
    async fn count(&self) -> Result<u64, SudokubeError>;
}
