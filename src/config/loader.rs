// src/config/loader.rs

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::config::model::{ButtonTargetConfig, ProcessTargetConfig, WatchConfig};
use crate::config::validate::validate_config;

/// Load a configuration file from a given path and return the classified
/// `WatchConfig`.
///
/// This only performs JSON deserialization and key classification; it does
/// **not** perform semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading config file at {:?}", path))?;

    parse_config(&contents).with_context(|| format!("parsing JSON config from {:?}", path))
}

/// Parse a configuration document and classify its entries.
///
/// Top-level keys are free-form labels:
/// - a key containing `"process"` contributes a process target
/// - a key containing `"button"` contributes a button target
/// - a key containing both contributes to both lists
/// - everything else is ignored
pub fn parse_config(contents: &str) -> Result<WatchConfig> {
    let doc: Value = serde_json::from_str(contents).context("deserializing JSON")?;
    let Value::Object(entries) = doc else {
        bail!("config root must be a JSON object");
    };

    let mut config = WatchConfig::default();
    for (key, value) in entries {
        let mut matched = false;
        if key.contains("process") {
            let target: ProcessTargetConfig = serde_json::from_value(value.clone())
                .with_context(|| format!("parsing process target {key:?}"))?;
            config.processes.push(target);
            matched = true;
        }
        if key.contains("button") {
            let target: ButtonTargetConfig = serde_json::from_value(value)
                .with_context(|| format!("parsing button target {key:?}"))?;
            config.buttons.push(target);
            matched = true;
        }
        if !matched {
            debug!(key = %key, "ignoring config entry, key names no target kind");
        }
    }

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads JSON.
/// - Applies defaults (handled by `serde` + field defaults).
/// - Checks that the document defines at least one target and that per-target
///   fields are sane.
///
/// Any failure here is fatal before a single watcher starts.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<WatchConfig> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}
