//! Configuration model for scaffold.
//!
//! This module defines the Config struct that represents `scaffold.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of config values. Command-line
//! flags are layered on top with [`Overrides`].

mod model;
mod operations;
pub mod types;


pub use model::{Config, Overrides};
pub use types::CONFIG_FILE_NAME;
