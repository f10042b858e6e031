// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append and read operations on the `Sudokus` table.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params};
use sudokube_core::{CanonicalPuzzle, SudokuRecord, SudokubeError};

use crate::database::{Database, map_tr_err};

/// Text form of `SolvedAt`. Fixed width, so it sorts chronologically.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

const SELECT_COLUMNS: &str = "SELECT Id, SolvedPuzzle, SolvedAt FROM Sudokus";

/// Insert a puzzle stamped with the current UTC time.
///
/// The timestamp is truncated to microseconds so the returned record is
/// identical to what a later read yields.
pub async fn append(db: &Database, puzzle: &CanonicalPuzzle) -> Result<SudokuRecord, SudokubeError> {
    let solved_at = Utc::now().trunc_subsecs(6);
    insert_at(db, puzzle, solved_at).await
}

/// Insert a puzzle with an explicit timestamp.
pub async fn insert_at(
    db: &Database,
    puzzle: &CanonicalPuzzle,
    solved_at: DateTime<Utc>,
) -> Result<SudokuRecord, SudokubeError> {
    let text = puzzle.as_str().to_string();
    let stamp = solved_at.format(TIMESTAMP_FORMAT).to_string();
    let id = db
        .connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO Sudokus (SolvedPuzzle, SolvedAt) VALUES (?1, ?2)",
                params![text, stamp],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(SudokuRecord {
        id,
        solved_puzzle: puzzle.clone(),
        solved_at,
    })
}

/// All records in insertion order.
pub async fn list(db: &Database) -> Result<Vec<SudokuRecord>, SudokubeError> {
    db.connection()
        .call(|conn| -> Result<Vec<SudokuRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY Id ASC"))?;
            let rows = stmt.query_map([], record_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// A single record by id.
pub async fn get(db: &Database, id: i64) -> Result<Option<SudokuRecord>, SudokubeError> {
    db.connection()
        .call(move |conn| -> Result<Option<SudokuRecord>, rusqlite::Error> {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE Id = ?1"),
                params![id],
                record_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of stored records.
pub async fn count(db: &Database) -> Result<u64, SudokubeError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM Sudokus", [], |row| row.get(0))
        })
        .await
        .map_err(map_tr_err)
        .map(|n| u64::try_from(n).unwrap_or(0))
}

fn record_from_row(row: &Row<'_>) -> Result<SudokuRecord, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let puzzle: String = row.get(1)?;
    let stamp: String = row.get(2)?;

    let solved_puzzle = CanonicalPuzzle::parse(&puzzle)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let solved_at = DateTime::parse_from_rfc3339(&stamp)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(SudokuRecord {
        id,
        solved_puzzle,
        solved_at,
    })
}
