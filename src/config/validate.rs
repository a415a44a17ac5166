// src/config/validate.rs

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::config::model::WatchConfig;

/// Run basic semantic validation against a loaded configuration.
///
/// Fatal:
/// - no targets at all
/// - negative timeouts
///
/// Warned but accepted:
/// - a process target with no command (it can never fire)
/// - one pin claimed by both watcher kinds (unsupported configuration)
pub fn validate_config(cfg: &WatchConfig) -> Result<()> {
    ensure_has_targets(cfg)?;
    validate_timeouts(cfg)?;
    warn_on_inert_process_targets(cfg);
    warn_on_shared_pins(cfg);
    Ok(())
}

fn ensure_has_targets(cfg: &WatchConfig) -> Result<()> {
    if cfg.processes.is_empty() && cfg.buttons.is_empty() {
        return Err(anyhow!(
            "config defines no targets (no key contains \"process\" or \"button\")"
        ));
    }
    Ok(())
}

fn validate_timeouts(cfg: &WatchConfig) -> Result<()> {
    if let Some(i) = cfg.processes.iter().position(|t| t.timeout < 0.0) {
        return Err(anyhow!("process target #{} has a negative timeout", i));
    }
    if let Some(i) = cfg.buttons.iter().position(|t| t.timeout < 0.0) {
        return Err(anyhow!("button target #{} has a negative timeout", i));
    }
    Ok(())
}

fn warn_on_inert_process_targets(cfg: &WatchConfig) {
    for (i, target) in cfg.processes.iter().enumerate() {
        if target.command.as_deref().unwrap_or("").is_empty() {
            warn!(index = i, "process target has no command and will never fire");
        }
    }
}

fn warn_on_shared_pins(cfg: &WatchConfig) {
    let process_pins: BTreeSet<u32> = cfg.processes.iter().filter_map(|t| t.port).collect();
    let button_pins: BTreeSet<u32> = cfg.buttons.iter().filter_map(|t| t.port).collect();
    for pin in process_pins.intersection(&button_pins) {
        warn!(
            pin = *pin,
            "pin assigned to both a process and a button target; this configuration is unsupported"
        );
    }
}
