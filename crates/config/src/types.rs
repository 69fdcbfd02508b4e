//! Configuration types

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollcallConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Database and roster file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Ledger tunables
    #[serde(default)]
    pub attendance: AttendanceConfig,
}

impl RollcallConfig {
    /// Replace the listen port, keeping the address
    pub fn with_port(mut self, port: u16) -> Self {
        self.server.listen.set_port(port);
        self
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,

    /// Log level, used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5000))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            log_level: default_log_level(),
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Roster CSV
    #[serde(default = "default_roster")]
    pub roster: PathBuf,
}

fn default_database() -> PathBuf {
    PathBuf::from("data/attendance.db")
}

fn default_roster() -> PathBuf {
    PathBuf::from("data/cleaned_class_list.csv")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            roster: default_roster(),
        }
    }
}

/// Attendance ledger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceConfig {
    /// Page size for attendance queries without a usable limit
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Prefix for generated session labels
    #[serde(default = "default_label_prefix")]
    pub session_label_prefix: String,
}

fn default_limit() -> u32 {
    200
}

fn default_label_prefix() -> String {
    "Lecture".to_string()
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            session_label_prefix: default_label_prefix(),
        }
    }
}
