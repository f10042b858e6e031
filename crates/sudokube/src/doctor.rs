// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sudokube doctor` command implementation.
//!
//! Runs diagnostic checks against the configuration, the record store, and a
//! running server, and prints one line per check.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use sudokube_config::SudokubeConfig;
use sudokube_core::SudokubeError;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed.
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `sudokube doctor` command.
///
/// With `--deep`, also runs the SQLite integrity check and reports jemalloc
/// statistics. With `--plain`, disables colored output.
pub async fn run_doctor(
    config: &SudokubeConfig,
    config_path: Option<&Path>,
    deep: bool,
    plain: bool,
) -> Result<(), SudokubeError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let db_path = config.storage.database_path.as_str();

    let mut results = vec![
        check_config(config_path).await,
        check_database(db_path).await,
        check_health_endpoint(config).await,
    ];
    if deep {
        results.push(check_db_integrity(db_path).await);
        results.push(check_memory_baseline().await);
    }

    println!();
    println!("  sudokube doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
        if !deep {
            println!("  Run with --deep for detailed diagnostics.");
        }
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Check configuration loads without errors.
async fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => sudokube_config::load_and_validate_path(path),
        None => sudokube_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the database exists, opens, and has the `Sudokus` table.
async fn check_database(db_path: &str) -> CheckResult {
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first run)"),
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new(
                "Database",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                start,
            );
        }
    };

    let count = conn
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM Sudokus", [], |row| row.get(0))
        })
        .await;

    match count {
        Ok(n) => CheckResult::new(
            "Database",
            CheckStatus::Pass,
            format!("connected, {n} record(s)"),
            start,
        ),
        Err(e) => CheckResult::new(
            "Database",
            CheckStatus::Fail,
            format!("query failed: {e}"),
            start,
        ),
    }
}

/// Check a running server answers `/health`.
async fn check_health_endpoint(config: &SudokubeConfig) -> CheckResult {
    let start = Instant::now();
    let url = health_url(&config.server.host, config.server.port);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            return CheckResult::new(
                "Health endpoint",
                CheckStatus::Fail,
                format!("HTTP client error: {e}"),
                start,
            );
        }
    };

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            CheckResult::new("Health endpoint", CheckStatus::Pass, "reachable", start)
        }
        Ok(resp) => CheckResult::new(
            "Health endpoint",
            CheckStatus::Warn,
            format!("status {}", resp.status()),
            start,
        ),
        Err(_) => CheckResult::new(
            "Health endpoint",
            CheckStatus::Warn,
            format!("not reachable at {url} (server may not be running)"),
            start,
        ),
    }
}

/// A wildcard bind address is probed through loopback.
fn health_url(host: &str, port: u16) -> String {
    let host = match host {
        "0.0.0.0" => "127.0.0.1",
        "::" => "[::1]",
        h if h.contains(':') => return format!("http://[{h}]:{port}/health"),
        h => h,
    };
    format!("http://{host}:{port}/health")
}

/// Deep check: SQLite integrity check.
async fn check_db_integrity(db_path: &str) -> CheckResult {
    let start = Instant::now();

    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "DB integrity",
            CheckStatus::Warn,
            "database not found (skipped)",
            start,
        );
    }

    let conn = match tokio_rusqlite::Connection::open(db_path).await {
        Ok(conn) => conn,
        Err(e) => {
            return CheckResult::new(
                "DB integrity",
                CheckStatus::Fail,
                format!("open failed: {e}"),
                start,
            );
        }
    };

    let rows = conn
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare("PRAGMA integrity_check")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
        .await;

    match rows {
        Ok(rows) if rows.len() == 1 && rows[0] == "ok" => {
            CheckResult::new("DB integrity", CheckStatus::Pass, "ok", start)
        }
        Ok(rows) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("{} issue(s) found", rows.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "DB integrity",
            CheckStatus::Fail,
            format!("check failed: {e}"),
            start,
        ),
    }
}

/// Deep check: memory baseline via jemalloc.
async fn check_memory_baseline() -> CheckResult {
    let start = Instant::now();

    #[cfg(not(target_env = "msvc"))]
    {
        let _ = tikv_jemalloc_ctl::epoch::advance();
        let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
        let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
        let allocated_mb = allocated as f64 / (1024.0 * 1024.0);
        let resident_mb = resident as f64 / (1024.0 * 1024.0);

        CheckResult::new(
            "Memory baseline",
            CheckStatus::Pass,
            format!("heap: {allocated_mb:.1} MB, resident: {resident_mb:.1} MB"),
            start,
        )
    }

    #[cfg(target_env = "msvc")]
    {
        CheckResult::new(
            "Memory baseline",
            CheckStatus::Warn,
            "jemalloc not available on MSVC",
            start,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use sudokube_config::model::StorageConfig;
    use sudokube_core::{CanonicalPuzzle, StorageAdapter};
    use sudokube_storage::SqliteStorage;

    async fn seeded_db(dir: &tempfile::TempDir, records: usize) -> String {
        let path = dir.path().join("doctor.db").to_string_lossy().to_string();
        let storage = SqliteStorage::new(StorageConfig {
            database_path: path.clone(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        let puzzle = CanonicalPuzzle::parse(&"0".repeat(81)).unwrap();
        for _ in 0..records {
            storage.append(&puzzle).await.unwrap();
        }
        storage.close().await.unwrap();
        path
    }

    #[test]
    fn plain_format_tags_status() {
        let result = CheckResult {
            name: "Database".to_string(),
            status: CheckStatus::Warn,
            message: "not found".to_string(),
            duration: Duration::from_millis(5),
        };
        let line = format_result(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("Database"));
        assert!(line.contains("(5ms)"));
    }

    #[test]
    fn health_url_probes_loopback_for_wildcard_hosts() {
        assert_eq!(health_url("0.0.0.0", 5000), "http://127.0.0.1:5000/health");
        assert_eq!(health_url("::", 5000), "http://[::1]:5000/health");
        assert_eq!(health_url("::1", 80), "http://[::1]:80/health");
        assert_eq!(health_url("localhost", 80), "http://localhost:80/health");
    }

    #[tokio::test]
    #[serial]
    async fn check_config_passes_with_defaults() {
        let result = check_config(None).await;
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.name, "Configuration");
    }

    #[tokio::test]
    async fn check_database_missing_warns() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.db");
        let result = check_database(missing.to_str().unwrap()).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
    }

    #[tokio::test]
    async fn check_database_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_db(&dir, 3).await;
        let result = check_database(&path).await;
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
        assert!(result.message.contains("3 record(s)"));
    }

    #[tokio::test]
    async fn check_database_without_schema_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foreign.db");
        std::fs::write(&path, b"").unwrap();
        let result = check_database(path.to_str().unwrap()).await;
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn check_db_integrity_passes_on_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded_db(&dir, 1).await;
        assert_eq!(check_db_integrity(&path).await.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn check_memory_baseline_passes() {
        let result = check_memory_baseline().await;
        assert!(result.status == CheckStatus::Pass || result.status == CheckStatus::Warn);
    }
}
