// src/config/mod.rs

//! Configuration loading and validation for pinwatch.
//!
//! Responsibilities:
//! - Define the JSON-backed target model (`model.rs`).
//! - Load a config document from disk and classify its entries (`loader.rs`).
//! - Validate basic invariants before any watcher starts (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_config};
pub use model::{ButtonTargetConfig, ProcessTargetConfig, WatchConfig};
pub use validate::validate_config;
