// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// File store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Flat directory holding uploaded files
    pub files_root: PathBuf,
    /// Directory holding the index document
    pub public_root: PathBuf,
    /// Index document name inside `public_root`
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Maximum accepted upload body, in bytes
    pub limit_file_size: u64,
    /// Create missing roots at startup
    #[serde(default = "default_create_dirs")]
    pub create_dirs: bool,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_file() -> String {
    "index.html".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_create_dirs() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl LoggingConfig {
    pub fn debug_enabled(&self) -> bool {
        self.level.eq_ignore_ascii_case("debug") || self.level.eq_ignore_ascii_case("trace")
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds allowed to receive a request's headers, 0 disables the limit.
    /// Bodies are never timed, so a slow transfer that keeps moving survives.
    pub header_read_timeout: u64,
    pub max_connections: Option<u64>,
}
