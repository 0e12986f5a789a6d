//! Configuration loading for the command-line tool.
//!
//! Sources, later ones winning:
//! 1. the config file (TOML, YAML, JSON or INI), if it exists
//! 2. `SCRAWL_*` environment variables (`SCRAWL_BORDER__COLOR=red`)
//! 3. `--set key=value` flags
//!
//! Nested tables flatten into dotted keys. File booleans map onto the
//! property convention: `false` becomes "no", `true` becomes "yes".

use std::path::Path;

use anyhow::{Context, Result, bail};
use scrawl::Properties;
use scrawl_common::constants::canonical_key;
use serde_json::Value;

/// Environment variable prefix
const ENV_PREFIX: &str = "SCRAWL";

/// Load the property set from `config_path`, the environment and overrides
pub fn load(config_path: &str, overrides: &[String]) -> Result<Properties> {
    let mut builder = config::Config::builder();

    if Path::new(config_path).exists() {
        builder = builder.add_source(config::File::with_name(config_path));
    } else {
        tracing::warn!(path = config_path, "Config file not found, using defaults");
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .ignore_empty(true),
        )
        .build()
        .context("Failed to load config file")?;

    let tree: Value = settings
        .try_deserialize()
        .context("Failed to parse config")?;

    let mut properties = Properties::new();
    flatten("", &tree, &mut properties);

    for entry in overrides {
        let (key, value) = parse_override(entry)?;
        properties.insert(normalize_key(key), value.to_string());
    }

    Ok(properties)
}

/// Split a `key=value` override
pub fn parse_override(entry: &str) -> Result<(&str, &str)> {
    match entry.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => bail!("Invalid override {entry:?}, expected KEY=VALUE"),
    }
}

/// Recognized keys get their canonical spelling; the config crate and
/// environment variables may lowercase them
fn normalize_key(key: &str) -> String {
    canonical_key(key).map_or_else(|| key.to_string(), str::to_string)
}

fn flatten(prefix: &str, value: &Value, out: &mut Properties) {
    let scalar = match value {
        Value::Null => return,
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
            return;
        }
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
    };

    if !prefix.is_empty() {
        out.insert(normalize_key(prefix), scalar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_tables() {
        let tree = json!({
            "border": { "enabled": false, "thickness": 2, "color": "red" },
            "strategy": { "glyphrenderer": "default" },
            "text": { "font": { "paths": ["a.ttf", "b.ttf"] } },
            "unused": null,
        });

        let mut out = Properties::new();
        flatten("", &tree, &mut out);

        assert_eq!(out.get("border.enabled").map(String::as_str), Some("no"));
        assert_eq!(out.get("border.thickness").map(String::as_str), Some("2"));
        assert_eq!(out.get("border.color").map(String::as_str), Some("red"));
        assert_eq!(out.get("strategy.glyphRenderer").map(String::as_str), Some("default"));
        assert_eq!(out.get("text.font.paths").map(String::as_str), Some("a.ttf,b.ttf"));
        assert!(!out.contains_key("unused"));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override("border.color=red").unwrap(), ("border.color", "red"));
        assert_eq!(parse_override("text.chars=a=b").unwrap(), ("text.chars", "a=b"));
        assert_eq!(parse_override("border.enabled=").unwrap(), ("border.enabled", ""));
        assert!(parse_override("border.color").is_err());
        assert!(parse_override("=red").is_err());
    }

    #[test]
    fn test_load_without_file_applies_overrides() {
        let overrides = vec!["border.thickness=3".to_string(), "STRATEGY.ENCODER=png".to_string()];
        let properties = load("/nonexistent/scrawl.toml", &overrides).unwrap();

        assert_eq!(properties.get("border.thickness").map(String::as_str), Some("3"));
        assert_eq!(properties.get("strategy.encoder").map(String::as_str), Some("png"));
    }
}
