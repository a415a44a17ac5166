// src/config/model.rs

use serde::Deserialize;

/// All watch targets extracted from a configuration document.
///
/// The JSON root is an object with free-form keys; classification into
/// process and button targets happens in the loader based on key substrings.
#[derive(Debug, Clone, Default)]
pub struct WatchConfig {
    pub processes: Vec<ProcessTargetConfig>,
    pub buttons: Vec<ButtonTargetConfig>,
}

/// One process-existence target, defined by any JSON entry whose key contains
/// `"process"`:
///
/// ```json
/// "process sshd": {
///     "command": "sshd",
///     "port": 17,
///     "onFound": "echo up",
///     "onLost": "echo down",
///     "timeout": 5
/// }
/// ```
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessTargetConfig {
    /// Output pin driven on edges; `None` means no hardware action.
    #[serde(default)]
    pub port: Option<u32>,

    /// Pin level written when the process is found; its inverse is written
    /// when lost. Setting this to `false` inverts output polarity.
    #[serde(default = "default_true")]
    pub active: bool,

    /// Substring searched for in process command lines. Empty or missing
    /// means this target never probes.
    #[serde(default)]
    pub command: Option<String>,

    /// Command to run when the process appears.
    #[serde(default, rename = "onFound")]
    pub on_found: Option<String>,

    /// Command to run when the process disappears.
    #[serde(default, rename = "onLost")]
    pub on_lost: Option<String>,

    /// Seconds before an executed command is force-terminated; 0 disables
    /// the timeout.
    #[serde(default)]
    pub timeout: f64,
}

fn default_true() -> bool {
    true
}

/// One debounced button target, defined by any JSON entry whose key contains
/// `"button"`:
///
/// ```json
/// "button shutdown": {
///     "port": 27,
///     "pull-up": true,
///     "active": false,
///     "execute": "sudo poweroff",
///     "timeout": 2
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ButtonTargetConfig {
    /// Input pin sampled each poll; `None` reads as constant low.
    #[serde(default)]
    pub port: Option<u32>,

    /// The armed level: samples at this level count toward the debounce
    /// threshold.
    #[serde(default)]
    pub active: bool,

    /// Configure the input with an internal pull-up.
    #[serde(default, rename = "pull-up")]
    pub pull_up: bool,

    /// Command to run when the debounced press is released.
    #[serde(default)]
    pub execute: String,

    /// Seconds before the executed command is force-terminated; 0 disables
    /// the timeout.
    #[serde(default)]
    pub timeout: f64,
}
