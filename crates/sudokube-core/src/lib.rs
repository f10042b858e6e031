// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for sudokube.
//!
//! Holds the error types, the puzzle and record types, and the adapter
//! traits that the storage backend implements.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CellFault, MISSING_INPUT_MESSAGE, SudokubeError, ValidationError};
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::{CanonicalPuzzle, GRID_SIZE, HealthStatus, PUZZLE_LEN, SudokuRecord};
