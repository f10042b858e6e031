// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-grid validation and flattening.
//!
//! Validation runs in three passes over the untyped request: presence of the
//! `sudoku` field, the 9x9 shape, then every cell in row-major order. No cell
//! is indexed before the shape pass has succeeded.

use serde_json::Value;
use tracing::debug;

use sudokube_core::{CanonicalPuzzle, CellFault, GRID_SIZE, ValidationError};

/// Wire field that carries the grid.
pub const GRID_FIELD: &str = "sudoku";

/// A typed 9x9 grid of single digits.
pub type Grid = [[u8; GRID_SIZE]; GRID_SIZE];

/// Validate an untyped request body and flatten its grid.
///
/// `None` and JSON `null` both mean the caller sent nothing.
pub fn normalize(input: Option<&Value>) -> Result<CanonicalPuzzle, ValidationError> {
    let grid = grid_field(input)?;
    let rows = check_shape(grid)?;
    let digits = read_cells(&rows)?;
    let puzzle = normalize_grid(&digits)?;
    debug!(puzzle = %puzzle, "grid normalized");
    Ok(puzzle)
}

/// Flatten an already-typed grid.
pub fn normalize_grid(grid: &Grid) -> Result<CanonicalPuzzle, ValidationError> {
    CanonicalPuzzle::from_digits(grid)
}

fn grid_field(input: Option<&Value>) -> Result<&Value, ValidationError> {
    match input
        .and_then(Value::as_object)
        .and_then(|body| body.get(GRID_FIELD))
    {
        None | Some(Value::Null) => Err(ValidationError::MissingInput),
        Some(grid) => Ok(grid),
    }
}

fn check_shape(grid: &Value) -> Result<Vec<&[Value]>, ValidationError> {
    let Some(rows) = grid.as_array() else {
        return Err(ValidationError::MalformedGrid {
            reason: format!("`{GRID_FIELD}` must be an array of {GRID_SIZE} rows"),
            row: None,
        });
    };
    if rows.len() != GRID_SIZE {
        return Err(ValidationError::MalformedGrid {
            reason: format!("expected {GRID_SIZE} rows, got {}", rows.len()),
            row: None,
        });
    }

    rows.iter()
        .enumerate()
        .map(|(r, row)| match row.as_array() {
            Some(cells) if cells.len() == GRID_SIZE => Ok(cells.as_slice()),
            Some(cells) => Err(ValidationError::MalformedGrid {
                reason: format!("row {r} has {} cells, expected {GRID_SIZE}", cells.len()),
                row: Some(r),
            }),
            None => Err(ValidationError::MalformedGrid {
                reason: format!("row {r} is not an array"),
                row: Some(r),
            }),
        })
        .collect()
}

fn read_cells(rows: &[&[Value]]) -> Result<Grid, ValidationError> {
    let mut grid = [[0u8; GRID_SIZE]; GRID_SIZE];
    for (r, cells) in rows.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            grid[r][c] = read_cell(cell).map_err(|reason| ValidationError::InvalidCell {
                row: r,
                column: c,
                reason,
            })?;
        }
    }
    Ok(grid)
}

fn read_cell(cell: &Value) -> Result<u8, CellFault> {
    let Value::Number(n) = cell else {
        return Err(CellFault::NotAnInteger);
    };
    // Float-encoded numbers (including 5.0) are not integers on the wire.
    let value = match (n.as_i64(), n.as_u64()) {
        (Some(v), _) => v,
        (None, Some(_)) => i64::MAX,
        (None, None) => return Err(CellFault::NotAnInteger),
    };
    u8::try_from(value)
        .ok()
        .filter(|d| *d <= 9)
        .ok_or(CellFault::OutOfRange(value))
}
