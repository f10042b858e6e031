// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the sudokube configuration system.

use sudokube_config::diagnostic::ConfigError;
use sudokube_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[server]
host = "0.0.0.0"
port = 8000
max_body_bytes = 1024

[storage]
database_path = "/tmp/sudokube-test.db"
wal_mode = false

[cors]
allowed_origins = ["http://localhost:8080/", "https://grid.example.com"]

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.max_body_bytes, 1024);
    assert_eq!(config.storage.database_path, "/tmp/sudokube-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.cors.allowed_origins.len(), 2);
    assert_eq!(config.logging.level, "debug");
}

/// Empty input yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.cors.allowed_origins, vec!["http://localhost:8080"]);
}

/// A typo in a key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[server]
prot = 8000
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. } if key == "prot" && s == "port"
        )
    });
    assert!(found, "expected UnknownKey(prot -> port), got: {errors:?}");
}

/// A value of the wrong type produces an InvalidType diagnostic.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[server]
port = "eighty"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string port");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_loader() {
    let toml = r#"
[storage]
database_path = ""

[cors]
allowed_origins = ["ftp://nope"]
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

/// Unknown top-level sections are rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[solver]
enabled = true
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    assert!(err.to_string().contains("solver"), "got: {err}");
}
