// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for sudokube.

use std::fmt;

use thiserror::Error;

/// Message returned to callers that submit no puzzle data at all.
pub const MISSING_INPUT_MESSAGE: &str = "Request is invalid, please provide Sudoku data.";

/// Why a single grid cell was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellFault {
    /// The cell is not a JSON integer (text, null, bool, fractional number).
    NotAnInteger,
    /// The cell is an integer but not a single decimal digit.
    OutOfRange(i64),
}

impl fmt::Display for CellFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellFault::NotAnInteger => f.write_str("value is not an integer"),
            CellFault::OutOfRange(v) => write!(f, "value {v} is outside 0..=9"),
        }
    }
}

/// Rejection produced while normalizing a submitted grid.
///
/// Every variant is caused by the client and never by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No body, no parseable body, or no `sudoku` field.
    #[error("{MISSING_INPUT_MESSAGE}")]
    MissingInput,

    /// The grid is not a 9x9 array of arrays. `row` is set when a single
    /// row is at fault.
    #[error("malformed grid: {reason}")]
    MalformedGrid { reason: String, row: Option<usize> },

    /// A cell could not be used as a sudoku digit.
    #[error("invalid cell at row {row}, column {column}: {reason}")]
    InvalidCell {
        row: usize,
        column: usize,
        reason: CellFault,
    },
}

/// The primary error type used across sudokube crates.
#[derive(Debug, Error)]
pub enum SudokubeError {
    /// Configuration errors (invalid TOML, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The submitted grid was rejected before any write happened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store could not be reached or refused the write.
    #[error("storage unavailable: {source}")]
    StorageUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SudokubeError {
    /// Wrap any storage-layer error.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        SudokubeError::StorageUnavailable {
            source: source.into(),
        }
    }

    /// True when the failure was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SudokubeError::Validation(_))
    }
}
