// src/watch/mod.rs

//! The watcher state machines and their shared poll loop.
//!
//! - [`runner`] owns the periodic check/sleep/stop contract shared by both
//!   watcher kinds.
//! - [`process`] watches the process table and fires on existence edges.
//! - [`button`] watches GPIO input pins with debounce counting.
//!
//! Watchers only ever mutate their own target state; firing an action means
//! one optional pin write plus one fire-and-forget command dispatch. The two
//! watchers never share a target list, so no locking is needed between them.

pub mod button;
pub mod process;
pub mod runner;

pub use button::{ButtonWatcher, DEBOUNCE_COUNT};
pub use process::ProcessWatcher;
pub use runner::{spawn_watch, stop_channel, StopHandle, StopToken, Watch};
