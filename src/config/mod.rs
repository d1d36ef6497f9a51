// Configuration module entry point
// Loads the immutable server configuration and the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig};

/// Prefix for environment overrides, e.g. `YAFS_STORAGE__LIMIT_FILE_SIZE`
const ENV_PREFIX: &str = "YAFS";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Built-in defaults, without any file or environment source
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("storage.files_root", "files")?
            .set_default("storage.public_root", "public")?
            .set_default("storage.index_file", "index.html")?
            .set_default("storage.limit_file_size", 1_048_576)? // 1MB
            .set_default("storage.create_dirs", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.index_file, "index.html");
        assert_eq!(cfg.storage.limit_file_size, 1_048_576);
        assert!(cfg.logging.access_log);
        assert!(!cfg.logging.debug_enabled());
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            "[storage]\nfiles_root = \"/srv/files\"\nlimit_file_size = 42\n",
        )
        .unwrap();

        let base = dir.path().join("server");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.storage.files_root, std::path::PathBuf::from("/srv/files"));
        assert_eq!(cfg.storage.limit_file_size, 42);
        assert_eq!(cfg.storage.public_root, std::path::PathBuf::from("public"));
    }

    #[test]
    fn test_invalid_address() {
        let mut cfg = Config::defaults().unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
