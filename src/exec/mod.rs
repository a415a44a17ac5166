// src/exec/mod.rs

//! Background command execution.
//!
//! Watchers hand commands over an mpsc channel and never wait for the result:
//! each command runs in its own Tokio task through the platform shell, with
//! the per-target timeout enforced here. Execution outcomes are logged, never
//! reported back to the watchers.

pub mod command;

pub use command::{dispatch, spawn_executor, CommandRequest};
