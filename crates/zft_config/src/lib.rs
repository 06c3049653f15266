//! Parsing and validation of `zft.toml` placer configuration files.
//!
//! Produces a strongly-typed [`PlacerConfig`]. Command-line flags are layered
//! on top of it by the CLI.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
