// src/config/mod.rs

//! Configuration for the `ffrun` binary.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate it into a checked [`ConfigFile`] (`validate.rs`).
//!
//! The library itself is configured through
//! [`crate::exec::RunnerBuilder`]; this module only feeds that builder.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, IoSection, RawConfigFile, Redirect, RunnerSection};
pub use validate::{parse_duration, parse_timeout};
