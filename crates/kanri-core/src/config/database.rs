//! Document store configuration.

use serde::{Deserialize, Serialize};

/// MongoDB connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection URI.
    pub url: String,
    /// Database name.
    pub database: String,
    /// Server selection timeout in milliseconds.
    ///
    /// Kept short so startup fails fast against an unreachable server
    /// instead of hanging on the driver default.
    #[serde(default = "default_server_selection_timeout")]
    pub server_selection_timeout_ms: u64,
    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    /// Maximum number of connections in the driver pool.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
}

fn default_server_selection_timeout() -> u64 {
    3000
}

fn default_connect_timeout() -> u64 {
    3000
}

fn default_max_pool_size() -> u32 {
    20
}
