// src/errors.rs

//! Crate-wide error aliases.
//!
//! Currently a thin wrapper around `anyhow`; the module gives a single place
//! to add structured error types later.

pub use anyhow::{Error, Result};
