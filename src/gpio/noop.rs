// src/gpio/noop.rs

use tracing::trace;

use crate::gpio::PinAdapter;

/// Stand-in adapter for hosts without GPIO hardware.
///
/// Every write is discarded and every read returns false, so watcher logic
/// runs (and can be exercised) on a machine without the device.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAdapter;

impl PinAdapter for NoopAdapter {
    fn setup_output(&self, pin: u32) {
        trace!(pin, "noop setup_output");
    }

    fn setup_input(&self, pin: u32, pull_up: bool) {
        trace!(pin, pull_up, "noop setup_input");
    }

    fn read_level(&self, pin: u32) -> bool {
        trace!(pin, "noop read_level -> false");
        false
    }

    fn write_level(&self, pin: u32, level: bool) {
        trace!(pin, level, "noop write_level");
    }

    fn release(&self) {}
}
