// SPDX-FileCopyrightText: 2026 Sudokube Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment extraction failures into miette diagnostics.
//!
//! Unknown keys are pointed at in the file they came from when that file is
//! among the known sources, and carry a "did you mean" hint ranked by
//! Jaro-Winkler similarity.

#![allow(unused_assignments)] // emitted by the miette derive

use std::io::IsTerminal;

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

/// Candidates scoring at or below this are not offered as corrections.
const SIMILARITY_FLOOR: f64 = 0.75;

/// A TOML document that diagnostics may quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Display name, normally the file path.
    pub name: String,
    pub content: String,
}

impl ConfigSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One problem found while loading or validating configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The key is not defined for its section.
    #[error("`{key}` is not a recognized setting")]
    #[diagnostic(
        code(sudokube::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is close enough.
        suggestion: Option<String>,
        /// Valid keys for the section, comma separated.
        valid_keys: String,
        #[label("unrecognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type ({detail})")]
    #[diagnostic(code(sudokube::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("`{key}` is required")]
    #[diagnostic(
        code(sudokube::config::missing_key),
        help("set `{key}` in sudokube.toml")
    )]
    MissingKey { key: String },

    /// A value parsed but is not acceptable.
    #[error("invalid setting: {message}")]
    #[diagnostic(code(sudokube::config::validation))]
    Validation { message: String },

    #[error("{0}")]
    #[diagnostic(code(sudokube::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    let valid = format!("valid keys here: {valid_keys}");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? {valid}"),
        None => valid,
    }
}

/// Split a figment error into one diagnostic per underlying failure.
pub fn from_figment(err: figment::Error, sources: &[ConfigSource]) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = locate(&error, field, sources).unzip();
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: closest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: qualified(&error.path, field),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn qualified(path: &[String], field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", path.join("."))
    }
}

/// Span and source of `field` in the file figment says the error came from.
fn locate(
    error: &figment::Error,
    field: &str,
    sources: &[ConfigSource],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let figment::Source::File(path) = error.metadata.as_ref()?.source.as_ref()? else {
        return None;
    };
    let name = path.display().to_string();
    let source = sources.iter().find(|s| s.name == name)?;
    let offset = key_offset(&source.content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, source.content.clone()),
    ))
}

/// Byte offset of `field` as a key inside the table named by `path`.
///
/// With an empty `path` the search starts at the top of the document;
/// otherwise it starts after the `[section]` header.
pub fn key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        if let Some(after) = rest.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// The valid key most similar to `unknown`, if any is similar enough.
pub fn closest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key.as_ref()), key.as_ref()))
        .filter(|(score, _)| *score > SIMILARITY_FLOOR)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr, colored only when stderr is a terminal.
pub fn render_errors(errors: &[ConfigError]) {
    let theme = if std::io::stderr().is_terminal() {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);

    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_key_corrects_transposition() {
        assert_eq!(
            closest_key("prot", &["host", "port", "max_body_bytes"]),
            Some("port".to_string())
        );
    }

    #[test]
    fn closest_key_corrects_dropped_letter() {
        assert_eq!(
            closest_key("database_pth", &["database_path", "wal_mode"]),
            Some("database_path".to_string())
        );
    }

    #[test]
    fn closest_key_gives_up_on_noise() {
        assert_eq!(closest_key("zzzzzz", &["host", "port"]), None);
    }

    #[test]
    fn key_offset_searches_inside_named_section() {
        let content = "[storage]\nwal_mode = true\n[server]\n  prot = 1\n";
        let offset = key_offset(content, &["server".to_string()], "prot").unwrap();
        assert_eq!(&content[offset..offset + 4], "prot");
    }

    #[test]
    fn key_offset_ignores_longer_keys_with_same_prefix() {
        let content = "[server]\nporter = 2\nport = 1\n";
        let offset = key_offset(content, &["server".to_string()], "port").unwrap();
        assert_eq!(&content[offset..], "port = 1\n");
    }

    #[test]
    fn key_offset_without_section_header_is_none() {
        let path = vec!["cors".to_string()];
        assert_eq!(key_offset("[server]\nport = 1\n", &path, "port"), None);
    }

    #[test]
    fn unknown_key_help_lists_valid_keys() {
        let help = unknown_key_help(Some("port"), "host, port");
        assert!(help.starts_with("did you mean `port`?"));
        assert!(help.ends_with("host, port"));
        assert_eq!(unknown_key_help(None, "host"), "valid keys here: host");
    }

    #[test]
    fn missing_key_is_qualified_by_section() {
        assert_eq!(qualified(&["server".to_string()], "port"), "server.port");
        assert_eq!(qualified(&[], "server"), "server");
    }
}
