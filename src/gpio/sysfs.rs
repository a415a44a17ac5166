// src/gpio/sysfs.rs

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::gpio::PinAdapter;

const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// The kernel creates the per-pin directory asynchronously after export; we
/// poll briefly for it before giving up on setup for that pin.
const EXPORT_SETTLE_ATTEMPTS: u32 = 5;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Real pin access through the Linux sysfs GPIO interface.
///
/// Exported pins are remembered so [`PinAdapter::release`] can unexport them
/// on shutdown. All I/O failures are logged and swallowed: a pin problem must
/// never take a watcher down.
pub struct SysfsAdapter {
    root: PathBuf,
    exported: Mutex<BTreeSet<u32>>,
}

impl SysfsAdapter {
    /// Whether this host exposes the sysfs GPIO interface at all.
    pub fn available() -> bool {
        Path::new(SYSFS_GPIO_ROOT).is_dir()
    }

    pub fn new() -> Self {
        Self::with_root(SYSFS_GPIO_ROOT)
    }

    /// Adapter rooted at an arbitrary directory (tests use a temp dir).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exported: Mutex::new(BTreeSet::new()),
        }
    }

    fn exported(&self) -> MutexGuard<'_, BTreeSet<u32>> {
        self.exported.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pin_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{pin}"))
    }

    fn export(&self, pin: u32) {
        if self.exported().contains(&pin) {
            return;
        }

        if !self.pin_dir(pin).is_dir() {
            if let Err(err) = fs::write(self.root.join("export"), pin.to_string()) {
                warn!(pin, error = %err, "failed to export gpio pin");
            }
            for _ in 0..EXPORT_SETTLE_ATTEMPTS {
                if self.pin_dir(pin).is_dir() {
                    break;
                }
                std::thread::sleep(EXPORT_SETTLE_DELAY);
            }
        }

        self.exported().insert(pin);
    }

    fn set_direction(&self, pin: u32, direction: &str) {
        let path = self.pin_dir(pin).join("direction");
        if let Err(err) = fs::write(&path, direction) {
            warn!(pin, direction, error = %err, "failed to set gpio direction");
        }
    }
}

impl Default for SysfsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PinAdapter for SysfsAdapter {
    fn setup_output(&self, pin: u32) {
        self.export(pin);
        self.set_direction(pin, "out");
    }

    fn setup_input(&self, pin: u32, pull_up: bool) {
        self.export(pin);
        self.set_direction(pin, "in");
        if pull_up {
            // Sysfs has no bias control; the board default applies.
            warn!(
                pin,
                "pull-up requested but the sysfs interface cannot configure pin bias"
            );
        }
    }

    fn read_level(&self, pin: u32) -> bool {
        match fs::read_to_string(self.pin_dir(pin).join("value")) {
            Ok(raw) => raw.trim() == "1",
            Err(err) => {
                debug!(pin, error = %err, "gpio read failed, treating as low");
                false
            }
        }
    }

    fn write_level(&self, pin: u32, level: bool) {
        let raw = if level { "1" } else { "0" };
        if let Err(err) = fs::write(self.pin_dir(pin).join("value"), raw) {
            warn!(pin, level, error = %err, "gpio write failed");
        }
    }

    fn release(&self) {
        let pins = std::mem::take(&mut *self.exported());
        for pin in pins {
            if let Err(err) = fs::write(self.root.join("unexport"), pin.to_string()) {
                debug!(pin, error = %err, "failed to unexport gpio pin");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn adapter_with_pin(pin: u32) -> (tempfile::TempDir, SysfsAdapter) {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join(format!("gpio{pin}"))).expect("pin dir");
        let adapter = SysfsAdapter::with_root(dir.path());
        (dir, adapter)
    }

    #[test]
    fn write_then_read_roundtrips_through_value_file() {
        let (dir, adapter) = adapter_with_pin(17);

        adapter.setup_output(17);
        adapter.write_level(17, true);
        assert!(adapter.read_level(17));

        adapter.write_level(17, false);
        assert!(!adapter.read_level(17));

        let direction = fs::read_to_string(dir.path().join("gpio17/direction")).expect("direction");
        assert_eq!(direction, "out");
    }

    #[test]
    fn setup_input_sets_direction_in() {
        let (dir, adapter) = adapter_with_pin(27);
        adapter.setup_input(27, true);
        let direction = fs::read_to_string(dir.path().join("gpio27/direction")).expect("direction");
        assert_eq!(direction, "in");
    }

    #[test]
    fn read_of_missing_pin_is_false_never_a_panic() {
        let dir = tempdir().expect("tempdir");
        let adapter = SysfsAdapter::with_root(dir.path());
        assert!(!adapter.read_level(99));
        adapter.write_level(99, true); // swallowed
    }

    #[test]
    fn release_unexports_claimed_pins() {
        let (dir, adapter) = adapter_with_pin(5);
        adapter.setup_output(5);
        adapter.release();
        let unexported = fs::read_to_string(dir.path().join("unexport")).expect("unexport file");
        assert_eq!(unexported, "5");
    }
}
