//! Configuration for rawcat.
//!
//! Loads an optional TOML configuration file from `~/.rawcat/config.toml`.
//! Everything has a sensible default, so the file is not required.
//!
//! # Configuration File
//!
//! ```toml
//! # Maximum bytes per read from stdin and from the socket
//! chunk_size = 1024
//!
//! # Give up on the TCP handshake after this many seconds
//! # (omit for the OS default blocking connect)
//! connect_timeout_secs = 10
//!
//! [log]
//! enabled = true
//! level = "info"
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::relay::DEFAULT_CHUNK_SIZE;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum bytes read from a source in one call
    pub chunk_size: usize,
    /// TCP connect timeout in seconds; unset means a blocking connect
    pub connect_timeout_secs: Option<u64>,
    /// Log settings
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout_secs: None,
            log: LogConfig::default(),
        }
    }
}

/// Log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub level: String, // "error", "warn", "info", "debug", "trace"
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults when the file
    /// is missing or malformed.
    pub fn load() -> Self {
        let mut config = Self::default();
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(parsed) = toml::from_str(&content) {
                        config = parsed;
                    }
                }
            }
        }
        config.sanitize();
        config
    }

    /// Connect timeout as a `Duration`, if one is configured.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    // A zero-byte read buffer would look like instant EOF to the readers.
    fn sanitize(&mut self) {
        if self.chunk_size == 0 {
            self.chunk_size = DEFAULT_CHUNK_SIZE;
        }
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".rawcat").join("config.toml"))
    }
}

/// Get home directory
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert!(config.connect_timeout_secs.is_none());
        assert!(config.log.enabled);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("chunk_size = 256").unwrap();
        assert_eq!(config.chunk_size, 256);
        assert!(config.connect_timeout_secs.is_none());
        assert!(config.log.enabled);
    }

    #[test]
    fn parses_full_file() {
        let config: Config = toml::from_str(
            r#"
            chunk_size = 4096
            connect_timeout_secs = 10

            [log]
            enabled = false
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(10)));
        assert!(!config.log.enabled);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn zero_chunk_size_is_replaced() {
        let mut config: Config = toml::from_str("chunk_size = 0").unwrap();
        config.sanitize();
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    }
}
