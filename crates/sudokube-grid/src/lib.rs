// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grid normalizer for sudokube.
//!
//! Turns a submitted request body into a [`CanonicalPuzzle`], or rejects it
//! with a [`ValidationError`]. This is a shape and type validator plus a
//! flattening transform; it does not check sudoku legality.
//!
//! ```
//! use serde_json::json;
//!
//! let body = json!({ "sudoku": vec![vec![0; 9]; 9] });
//! let puzzle = sudokube_grid::normalize(Some(&body)).unwrap();
//! assert_eq!(puzzle.as_str(), "0".repeat(81));
//! ```
//!
//! [`CanonicalPuzzle`]: sudokube_core::CanonicalPuzzle
//! [`ValidationError`]: sudokube_core::ValidationError

pub mod normalize;

pub use normalize::{GRID_FIELD, Grid, normalize, normalize_grid};
