// src/watch/process.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::model::ProcessTargetConfig;
use crate::exec::{self, CommandRequest};
use crate::gpio::PinAdapter;
use crate::probe::ProcessProbe;
use crate::watch::runner::Watch;

/// Mutable per-target state, owned exclusively by the watcher.
#[derive(Debug, Default)]
struct EdgeState {
    status: bool,
    prev_status: bool,
}

struct ProcessEntry {
    cfg: ProcessTargetConfig,
    state: EdgeState,
}

/// Watches the process table and fires on existence edges.
///
/// Strictly edge-triggered: an action fires only when a probe result differs
/// from the previous poll, never on repeated identical results.
pub struct ProcessWatcher {
    targets: Vec<ProcessEntry>,
    probe: Box<dyn ProcessProbe>,
    pins: Arc<dyn PinAdapter>,
    exec_tx: mpsc::Sender<CommandRequest>,
    period: Duration,
}

impl ProcessWatcher {
    /// Build the watcher and seed initial state.
    ///
    /// Output pins are configured here, and each target with a command gets
    /// one synchronous probe so that `status == prev_status` on entry to the
    /// first `check()`. Construction therefore never fires an action.
    pub fn new(
        configs: Vec<ProcessTargetConfig>,
        probe: Box<dyn ProcessProbe>,
        pins: Arc<dyn PinAdapter>,
        exec_tx: mpsc::Sender<CommandRequest>,
        period: Duration,
    ) -> Self {
        let mut targets = Vec::with_capacity(configs.len());
        for cfg in configs {
            if let Some(port) = cfg.port {
                pins.setup_output(port);
            }
            let status = match cfg.command.as_deref() {
                Some(command) if !command.is_empty() => probe.exists(command),
                _ => false,
            };
            debug!(command = ?cfg.command, initial = status, "seeded process target");
            targets.push(ProcessEntry {
                cfg,
                state: EdgeState {
                    status,
                    prev_status: status,
                },
            });
        }
        info!(targets = targets.len(), period = ?period, "process watcher ready");
        Self {
            targets,
            probe,
            pins,
            exec_tx,
            period,
        }
    }
}

impl Watch for ProcessWatcher {
    fn name(&self) -> &'static str {
        "process"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn check(&mut self) {
        for entry in &mut self.targets {
            let Some(command) = entry.cfg.command.as_deref().filter(|c| !c.is_empty()) else {
                continue;
            };
            entry.state.status = self.probe.exists(command);
            if entry.state.prev_status != entry.state.status {
                entry.state.prev_status = entry.state.status;
                fire(
                    self.pins.as_ref(),
                    &self.exec_tx,
                    &entry.cfg,
                    entry.state.status,
                );
            }
        }
    }
}

/// Apply a process edge: set the output pin, then dispatch the configured
/// command for this direction.
fn fire(
    pins: &dyn PinAdapter,
    exec_tx: &mpsc::Sender<CommandRequest>,
    cfg: &ProcessTargetConfig,
    found: bool,
) {
    info!(command = ?cfg.command, found, "process existence changed");

    // `active` selects output polarity: found writes the active level, lost
    // writes its inverse.
    let level = if found { cfg.active } else { !cfg.active };
    if let Some(port) = cfg.port {
        pins.write_level(port, level);
    }

    let action = if found {
        cfg.on_found.as_deref()
    } else {
        cfg.on_lost.as_deref()
    };
    if let Some(command) = action.filter(|c| !c.is_empty()) {
        exec::dispatch(exec_tx, command, cfg.timeout);
    }
}
