// src/watch/button.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::model::ButtonTargetConfig;
use crate::exec::{self, CommandRequest};
use crate::gpio::PinAdapter;
use crate::watch::runner::Watch;

/// Consecutive stable samples (beyond the initial change) required at the
/// armed level before a fire is latched. The raw sample period is the nominal
/// debounce period divided by this factor.
pub const DEBOUNCE_COUNT: u32 = 3;

#[derive(Debug, Default)]
struct ButtonState {
    prev_status: bool,
    count: u32,
    /// Latched once the debounce threshold is exceeded; the action fires on
    /// the next raw level change, not at the moment of latching.
    pending: bool,
}

struct ButtonEntry {
    cfg: ButtonTargetConfig,
    state: ButtonState,
}

/// Watches GPIO input pins and fires a debounced action per button.
///
/// A press is confirmed by consecutive samples at the armed level; the
/// configured command then fires on the release back to the opposite level.
/// A bounce that only touches the armed level briefly never fires.
pub struct ButtonWatcher {
    targets: Vec<ButtonEntry>,
    pins: Arc<dyn PinAdapter>,
    exec_tx: mpsc::Sender<CommandRequest>,
    period: Duration,
}

impl ButtonWatcher {
    /// Build the watcher, configure input pins, and seed `prev_status` with
    /// one synchronous read per target so construction never fires.
    ///
    /// `debounce_period` is the nominal interval from the CLI; raw sampling
    /// runs `DEBOUNCE_COUNT` times faster.
    pub fn new(
        configs: Vec<ButtonTargetConfig>,
        pins: Arc<dyn PinAdapter>,
        exec_tx: mpsc::Sender<CommandRequest>,
        debounce_period: Duration,
    ) -> Self {
        let period = debounce_period / DEBOUNCE_COUNT;
        let mut targets = Vec::with_capacity(configs.len());
        for cfg in configs {
            if let Some(port) = cfg.port {
                pins.setup_input(port, cfg.pull_up);
            }
            let prev_status = read_pin(pins.as_ref(), cfg.port);
            debug!(port = ?cfg.port, initial = prev_status, "seeded button target");
            targets.push(ButtonEntry {
                cfg,
                state: ButtonState {
                    prev_status,
                    ..ButtonState::default()
                },
            });
        }
        info!(targets = targets.len(), period = ?period, "button watcher ready");
        Self {
            targets,
            pins,
            exec_tx,
            period,
        }
    }
}

impl Watch for ButtonWatcher {
    fn name(&self) -> &'static str {
        "button"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn check(&mut self) {
        for entry in &mut self.targets {
            let cur = read_pin(self.pins.as_ref(), entry.cfg.port);
            let state = &mut entry.state;
            if state.prev_status != cur {
                // Raw level changed: restart the stability count, and fire if
                // a confirmed press was pending.
                state.prev_status = cur;
                state.count = 0;
                if state.pending {
                    state.pending = false;
                    fire(&self.exec_tx, &entry.cfg);
                }
            } else if cur == entry.cfg.active {
                state.count += 1;
                if state.count > DEBOUNCE_COUNT {
                    // Arms the pending fire only; the action itself waits for
                    // the release edge.
                    state.pending = true;
                }
            }
        }
    }
}

fn read_pin(pins: &dyn PinAdapter, port: Option<u32>) -> bool {
    port.is_some_and(|pin| pins.read_level(pin))
}

fn fire(exec_tx: &mpsc::Sender<CommandRequest>, cfg: &ButtonTargetConfig) {
    if cfg.execute.is_empty() {
        return;
    }
    info!(port = ?cfg.port, execute = %cfg.execute, "debounced button fired");
    exec::dispatch(exec_tx, &cfg.execute, cfg.timeout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Pin adapter that replays a scripted sequence of input levels.
    ///
    /// The first scripted level is consumed by the constructor's seed read;
    /// every later level corresponds to one `check()` call.
    #[derive(Default)]
    struct ScriptedPins {
        levels: Mutex<VecDeque<bool>>,
    }

    impl ScriptedPins {
        fn with_levels(levels: &[bool]) -> Arc<Self> {
            Arc::new(Self {
                levels: Mutex::new(levels.iter().copied().collect()),
            })
        }
    }

    impl PinAdapter for ScriptedPins {
        fn setup_output(&self, _pin: u32) {}
        fn setup_input(&self, _pin: u32, _pull_up: bool) {}
        fn read_level(&self, _pin: u32) -> bool {
            self.levels
                .lock()
                .unwrap()
                .pop_front()
                .expect("pin script exhausted")
        }
        fn write_level(&self, _pin: u32, _level: bool) {}
        fn release(&self) {}
    }

    fn target() -> ButtonTargetConfig {
        ButtonTargetConfig {
            port: Some(21),
            active: true,
            pull_up: false,
            execute: "echo pressed".into(),
            timeout: 2.0,
        }
    }

    fn watcher(
        cfg: ButtonTargetConfig,
        levels: &[bool],
    ) -> (ButtonWatcher, mpsc::Receiver<CommandRequest>) {
        let (tx, rx) = mpsc::channel(8);
        let watcher = ButtonWatcher::new(
            vec![cfg],
            ScriptedPins::with_levels(levels),
            tx,
            Duration::from_millis(150),
        );
        (watcher, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<CommandRequest>) -> Vec<CommandRequest> {
        let mut out = Vec::new();
        while let Ok(request) = rx.try_recv() {
            out.push(request);
        }
        out
    }

    #[test]
    fn confirmed_press_fires_on_release() {
        // Seed false; change to true, 4 stable armed samples latch the fire,
        // the release sample triggers it.
        let levels = [false, true, true, true, true, true, false];
        let (mut w, mut rx) = watcher(target(), &levels);

        for _ in 0..5 {
            w.check();
            assert!(drain(&mut rx).is_empty(), "must not fire before release");
        }

        w.check(); // release
        let fired = drain(&mut rx);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].command, "echo pressed");
        assert_eq!(fired[0].timeout_secs, 2.0);
    }

    #[test]
    fn three_stable_samples_are_not_enough() {
        // Change to true plus only 3 stable samples: count reaches the
        // threshold but never exceeds it, so the release fires nothing.
        let levels = [false, true, true, true, true, false, false];
        let (mut w, mut rx) = watcher(target(), &levels);

        for _ in 0..6 {
            w.check();
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn single_sample_bounce_never_fires() {
        let levels = [false, true, false, false, false];
        let (mut w, mut rx) = watcher(target(), &levels);

        for _ in 0..4 {
            w.check();
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn holding_the_armed_level_never_fires_without_release() {
        let mut levels = vec![false];
        levels.extend(std::iter::repeat(true).take(20));
        let (mut w, mut rx) = watcher(target(), &levels);

        for _ in 0..20 {
            w.check();
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn construction_never_fires_even_at_armed_level() {
        let levels = [true];
        let (_w, mut rx) = watcher(target(), &levels);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn unchanged_inactive_level_is_idempotent() {
        let levels = [false, false, false, false, false, false];
        let (mut w, mut rx) = watcher(target(), &levels);

        for _ in 0..5 {
            w.check();
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn empty_execute_dispatches_nothing() {
        let mut cfg = target();
        cfg.execute = String::new();

        let levels = [false, true, true, true, true, true, false];
        let (mut w, mut rx) = watcher(cfg, &levels);

        for _ in 0..6 {
            w.check();
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn a_second_press_fires_again() {
        let levels = [
            false, // seed
            true, true, true, true, true, // press 1 confirmed
            false, // release 1: fires
            true, true, true, true, true, // press 2 confirmed
            false, // release 2: fires
        ];
        let (mut w, mut rx) = watcher(target(), &levels);

        for _ in 0..12 {
            w.check();
        }
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn target_without_port_reads_low_and_stays_silent() {
        let mut cfg = target();
        cfg.port = None;
        cfg.active = false;

        // No port means the scripted adapter is never consulted.
        let (mut w, mut rx) = watcher(cfg, &[]);
        for _ in 0..10 {
            w.check();
        }
        assert!(drain(&mut rx).is_empty());
    }
}
