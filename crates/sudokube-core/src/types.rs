// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the normalizer, the store, and the gateway.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CellFault, ValidationError};

/// Width and height of a sudoku grid.
pub const GRID_SIZE: usize = 9;

/// Length of a [`CanonicalPuzzle`] string.
pub const PUZZLE_LEN: usize = GRID_SIZE * GRID_SIZE;

/// A flattened grid: exactly 81 ASCII digits in row-major order.
///
/// Position `9 * row + column` holds the digit of that cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalPuzzle(String);

impl CanonicalPuzzle {
    /// Build a puzzle from a grid of single digits.
    pub fn from_digits(rows: &[[u8; GRID_SIZE]; GRID_SIZE]) -> Result<Self, ValidationError> {
        let mut out = String::with_capacity(PUZZLE_LEN);
        for (row, cells) in rows.iter().enumerate() {
            for (column, &digit) in cells.iter().enumerate() {
                if digit > 9 {
                    return Err(ValidationError::InvalidCell {
                        row,
                        column,
                        reason: CellFault::OutOfRange(i64::from(digit)),
                    });
                }
                out.push(char::from(b'0' + digit));
            }
        }
        Ok(Self(out))
    }

    /// Parse an already-flattened puzzle string.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.len() != PUZZLE_LEN {
            return Err(ValidationError::MalformedGrid {
                reason: format!("expected {PUZZLE_LEN} digits, got {}", s.len()),
                row: None,
            });
        }
        if let Some(pos) = s.bytes().position(|b| !b.is_ascii_digit()) {
            return Err(ValidationError::InvalidCell {
                row: pos / GRID_SIZE,
                column: pos % GRID_SIZE,
                reason: CellFault::NotAnInteger,
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digit at the given cell, or `None` when out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> Option<u8> {
        if row >= GRID_SIZE || column >= GRID_SIZE {
            return None;
        }
        Some(self.0.as_bytes()[row * GRID_SIZE + column] - b'0')
    }
}

impl fmt::Display for CanonicalPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CanonicalPuzzle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CanonicalPuzzle> for String {
    fn from(value: CanonicalPuzzle) -> Self {
        value.0
    }
}

/// A persisted puzzle submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SudokuRecord {
    /// Store-assigned surrogate key, strictly increasing.
    pub id: i64,
    pub solved_puzzle: CanonicalPuzzle,
    /// Write time, always UTC.
    pub solved_at: DateTime<Utc>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}
