// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the sudokube REST API.
//!
//! Handles POST /api/sudoku, GET /api/sudoku, GET /api/sudoku/{id}, GET /health.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use sudokube_core::{
    HealthStatus, MISSING_INPUT_MESSAGE, SudokuRecord, SudokubeError, ValidationError,
};

use crate::server::GatewayState;

/// Confirmation text returned after a successful save.
pub const SAVED_MESSAGE: &str = "Sudoku solve saved in database.";

/// Response body for POST /api/sudoku.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub message: String,
    /// The record as stored, including its assigned id.
    pub record: SudokuRecord,
    /// The request body exactly as received.
    pub body_request: Value,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", "degraded" or "unhealthy".
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway state was created.
    pub uptime_secs: u64,
    /// Stored record count, omitted when the store is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<u64>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            row: None,
            column: None,
        }
    }
}

/// Maps a [`SudokubeError`] onto an HTTP response.
///
/// Validation failures are 400, storage failures 503, anything else 500.
#[derive(Debug)]
pub struct ApiError(pub SudokubeError);

impl From<SudokubeError> for ApiError {
    fn from(err: SudokubeError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            SudokubeError::Validation(ValidationError::MissingInput) => {
                (StatusCode::BAD_REQUEST, MISSING_INPUT_MESSAGE).into_response()
            }
            SudokubeError::Validation(err) => {
                let (row, column) = match &err {
                    ValidationError::MalformedGrid { row, .. } => (*row, None),
                    ValidationError::InvalidCell { row, column, .. } => (Some(*row), Some(*column)),
                    ValidationError::MissingInput => (None, None),
                };
                let body = ErrorResponse {
                    error: err.to_string(),
                    row,
                    column,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            err @ SudokubeError::StorageUnavailable { .. } => {
                warn!(error = %err, "request failed on storage");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::new(err.to_string())),
                )
                    .into_response()
            }
            err => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

/// POST /api/sudoku
///
/// The body is read raw so that an empty or unparseable payload is reported
/// the same way as a payload without a `sudoku` field.
pub async fn post_sudoku(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let request: Option<Value> = serde_json::from_slice(&body).ok();
    let puzzle = sudokube_grid::normalize(request.as_ref())?;
    let record = state.storage.append(&puzzle).await?;
    info!(id = record.id, "sudoku solve saved");

    Ok(Json(SaveResponse {
        message: SAVED_MESSAGE.to_string(),
        record,
        body_request: request.unwrap_or(Value::Null),
    }))
}

/// GET /api/sudoku
pub async fn list_sudokus(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<SudokuRecord>>, ApiError> {
    Ok(Json(state.storage.list().await?))
}

/// GET /api/sudoku/{id}
pub async fn get_sudoku(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    match state.storage.get(id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("no sudoku record with id {id}"))),
        )
            .into_response()),
    }
}

/// GET /health
///
/// Unauthenticated liveness probe backed by the store's own health check.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let uptime_secs = state.start_time.elapsed().as_secs();
    let version = env!("CARGO_PKG_VERSION").to_string();

    let status = match state.storage.health_check().await {
        Ok(HealthStatus::Healthy) => "ok",
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(%reason, "storage degraded");
            "degraded"
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(%reason, "storage unhealthy");
            "unhealthy"
        }
        Err(e) => {
            warn!(error = %e, "storage health check failed");
            "unhealthy"
        }
    };

    if status == "unhealthy" {
        let body = HealthResponse {
            status: status.to_string(),
            version,
            uptime_secs,
            records: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    }

    let body = HealthResponse {
        status: status.to_string(),
        version,
        uptime_secs,
        records: state.storage.count().await.ok(),
    };
    Json(body).into_response()
}
