// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sudokube.toml` > `~/.config/sudokube/sudokube.toml` > `/etc/sudokube/sudokube.toml`
//! with environment variable overrides via `SUDOKUBE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SudokubeConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/sudokube/sudokube.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "sudokube.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sudokube/sudokube.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sudokube/sudokube.toml` (system-wide)
/// 3. `~/.config/sudokube/sudokube.toml` (user XDG config)
/// 4. `./sudokube.toml` (local directory)
/// 5. `SUDOKUBE_*` environment variables
pub fn load_config() -> Result<SudokubeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SudokubeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SudokubeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SudokubeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SudokubeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SudokubeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SUDOKUBE_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
///
/// `SUDOKUBE_CORS_ALLOWED_ORIGINS` takes a TOML array, e.g. `["http://a","http://b"]`.
fn env_provider() -> Env {
    Env::prefixed("SUDOKUBE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("cors_", "cors.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("SUDOKUBE_SERVER_PORT", "9090");
            jail.set_env("SUDOKUBE_STORAGE_DATABASE_PATH", "/tmp/env.db");
            jail.set_env("SUDOKUBE_LOGGING_LEVEL", "debug");
            jail.set_env(
                "SUDOKUBE_CORS_ALLOWED_ORIGINS",
                r#"["http://a.test","http://b.test"]"#,
            );

            let config = load_config()?;
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.storage.database_path, "/tmp/env.db");
            assert_eq!(config.logging.level, "debug");
            assert_eq!(
                config.cors.allowed_origins,
                vec!["http://a.test", "http://b.test"]
            );
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults_and_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_PATH,
                r#"
                [server]
                host = "0.0.0.0"
                port = 7000
                "#,
            )?;
            jail.set_env("SUDOKUBE_SERVER_PORT", "7001");

            let config = load_config()?;
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 7001);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_used() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[storage]\nwal_mode = false\n")?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert!(!config.storage.wal_mode);
            Ok(())
        });
    }
}
