// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for sudokube integration tests.
//!
//! [`TestHarness`] runs the real gateway over a temp SQLite database on an
//! ephemeral port. The [`fixtures`] module holds grids shared by tests.

pub mod fixtures;
pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
