// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for sudokube.
//!
//! Accepts solved grids over `POST /api/sudoku`, normalizes them with
//! `sudokube-grid`, appends them to the record store, and serves the stored
//! records back over `GET /api/sudoku`. The store handle travels through
//! axum state; the gateway never opens storage itself.

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, ErrorResponse, SAVED_MESSAGE};
pub use server::{GatewayState, ServerConfig, build_router, serve, start_server};
