//! Configuration for StrataKV
//!
//! Centralized configuration with sensible defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, StrataError};

/// Main configuration for a StrataKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     └── items.redb       (database file)
    pub data_dir: PathBuf,

    /// Page cache budget handed to the engine (in bytes)
    pub cache_size_bytes: usize,

    // -------------------------------------------------------------------------
    // HTTP Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    /// Deadline for a single list request (milliseconds, 0 = none)
    pub request_timeout_ms: u64,

    /// How long shutdown waits for in-flight requests (milliseconds)
    pub shutdown_timeout_ms: u64,

    /// Page size used when a list request omits `page_size`
    pub default_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./stratakv_data"),
            cache_size_bytes: 64 * 1024 * 1024, // 64 MB
            listen_addr: "127.0.0.1:8080".to_string(),
            request_timeout_ms: 5000,
            shutdown_timeout_ms: 5000,
            default_page_size: 10,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse the listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            StrataError::Config(format!("invalid listen address {:?}: {}", self.listen_addr, e))
        })
    }

    /// Per-request scan deadline, if enabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Check the settings that can't be validated by the type system
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.cache_size_bytes == 0 {
            return Err(StrataError::Config("cache size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the engine cache size (in bytes)
    pub fn cache_size_bytes(mut self, size: usize) -> Self {
        self.config.cache_size_bytes = size;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the list request deadline (in milliseconds, 0 disables it)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    /// Set the graceful shutdown drain bound (in milliseconds)
    pub fn shutdown_timeout_ms(mut self, ms: u64) -> Self {
        self.config.shutdown_timeout_ms = ms;
        self
    }

    /// Set the page size applied when a request omits one
    pub fn default_page_size(mut self, size: usize) -> Self {
        self.config.default_page_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
