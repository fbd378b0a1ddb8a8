//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing file
//! or a partial file is valid.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, Role, ServiceConfig, SessionConfig, SyncConfig};
