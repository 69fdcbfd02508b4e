//! Rollcall Config - Configuration management
//!
//! TOML file with per-section defaults; every key is optional.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader};
pub use types::{AttendanceConfig, RollcallConfig, ServerConfig, StorageConfig};
