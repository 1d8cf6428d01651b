//! Environment variable fallbacks.
//!
//! Env vars are fallbacks, not overrides: they only fill fields that no
//! config file set.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Copy)]
enum Kind {
    Str,
    Int,
    Float,
}

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
    kind: Kind,
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "OKC_LOG_LEVEL",
        field_path: "logging.level",
        kind: Kind::Str,
    },
    EnvMapping {
        var_name: "OKC_LOG_FORMAT",
        field_path: "logging.format",
        kind: Kind::Str,
    },
    EnvMapping {
        var_name: "OKC_PLAYBACK_SPEED",
        field_path: "playback.speed",
        kind: Kind::Float,
    },
    EnvMapping {
        var_name: "OKC_TICK_MS",
        field_path: "playback.tick_ms",
        kind: Kind::Int,
    },
    EnvMapping {
        var_name: "OKC_LINE_MS",
        field_path: "playback.line_ms",
        kind: Kind::Int,
    },
];

/// Snapshot of the `OKC_*` environment.
#[must_use]
pub(crate) fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("OKC_"))
        .collect()
}

/// Apply env fallbacks to fields not in `set_by_files`.
///
/// Returns the number of variables applied.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a numeric variable does not parse.
pub(crate) fn apply_env_fallbacks<S: std::hash::BuildHasher>(
    merged: &mut toml::Value,
    set_by_files: &BTreeSet<String>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<usize> {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if set_by_files.contains(mapping.field_path) {
            continue;
        }
        let Some(raw) = env_vars.get(mapping.var_name) else {
            continue;
        };

        let value = coerce(mapping, raw.trim())?;
        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        set_field(merged, mapping.field_path, value);
        count = count.saturating_add(1);
    }

    Ok(count)
}

fn coerce(mapping: &EnvMapping, raw: &str) -> ConfigResult<toml::Value> {
    let bad = |expected: &str| ConfigError::EnvError {
        var_name: mapping.var_name.to_owned(),
        message: format!("expected {expected}, got '{raw}'"),
    };
    match mapping.kind {
        Kind::Str => Ok(toml::Value::String(raw.to_owned())),
        Kind::Int => raw
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| bad("an integer")),
        Kind::Float => raw
            .parse::<f64>()
            .map(toml::Value::Float)
            .map_err(|_| bad("a number")),
    }
}

/// Set a dotted `path` in the tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, value: toml::Value) {
    let mut current = root;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        if segments.peek().is_none() {
            table.insert(segment.to_owned(), value);
            return;
        }
        current = table
            .entry(segment.to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
}
