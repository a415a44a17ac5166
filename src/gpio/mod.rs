// src/gpio/mod.rs

//! GPIO pin access behind a small adapter trait.
//!
//! Watchers depend only on [`PinAdapter`]; the concrete implementation is
//! selected once at startup:
//!
//! - [`SysfsAdapter`] drives real pins through the Linux `/sys/class/gpio`
//!   file interface.
//! - [`NoopAdapter`] is used when no GPIO hardware is present: writes are
//!   discarded and reads return false, so the watchers run unchanged on a
//!   development machine.

pub mod noop;
pub mod sysfs;

use std::sync::Arc;

use tracing::info;

pub use noop::NoopAdapter;
pub use sysfs::SysfsAdapter;

/// Pin operations used by the watchers.
///
/// All operations are infallible from the caller's point of view: hardware
/// failures are logged inside the adapter and otherwise swallowed. A missing
/// pin is never an error.
pub trait PinAdapter: Send + Sync {
    /// Configure a pin as an output.
    fn setup_output(&self, pin: u32);

    /// Configure a pin as an input, optionally with an internal pull-up.
    fn setup_input(&self, pin: u32, pull_up: bool);

    /// Read the logical level of an input pin. Returns false on failure.
    fn read_level(&self, pin: u32) -> bool;

    /// Write the logical level of an output pin.
    fn write_level(&self, pin: u32, level: bool);

    /// Release every pin this adapter has claimed.
    fn release(&self);
}

/// Pick the adapter for this host: sysfs GPIO when available, no-op otherwise.
pub fn detect() -> Arc<dyn PinAdapter> {
    if SysfsAdapter::available() {
        Arc::new(SysfsAdapter::new())
    } else {
        info!("no GPIO hardware detected, pin operations are no-ops");
        Arc::new(NoopAdapter)
    }
}
