//! Listener Configuration
//!
//! Every setting has a default that reproduces the classic behavior: a
//! socket at `./chat.socket`, a backlog of 1 and a 128-byte buffer.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [listener]
//! socket_path = "/run/user/1000/chat.socket"
//! backlog = 1
//! buffer_size = 128
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::message::{DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};

/// Default rendezvous path, relative to the working directory
pub const DEFAULT_SOCKET_PATH: &str = "./chat.socket";

/// Default listen backlog
pub const DEFAULT_BACKLOG: i32 = 1;

/// Environment variable overriding the socket path
pub const ENV_SOCKET: &str = "CHATSOCK_SOCKET";
/// Environment variable overriding the backlog
pub const ENV_BACKLOG: &str = "CHATSOCK_BACKLOG";
/// Environment variable overriding the buffer size
pub const ENV_BUFFER_SIZE: &str = "CHATSOCK_BUFFER_SIZE";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration was last changed from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[listener]` section of the TOML configuration
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListenerToml {
    /// Unix socket path
    pub socket_path: Option<String>,
    /// Listen backlog
    pub backlog: Option<i32>,
    /// Receive buffer size, terminator included
    pub buffer_size: Option<usize>,
}

/// Root of the TOML configuration file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatsockToml {
    /// Listener settings
    pub listener: ListenerToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved listener configuration
#[derive(Clone, Debug)]
pub struct ListenerConfig {
    /// Rendezvous path of the socket
    pub socket_path: PathBuf,
    /// Pending-connection queue length passed to `listen`
    pub backlog: i32,
    /// Receive buffer capacity, terminator included
    pub buffer_size: usize,
    /// Config file the values were loaded from, if any
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            backlog: DEFAULT_BACKLOG,
            buffer_size: DEFAULT_BUFFER_SIZE,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ListenerConfig {
    /// Default configuration listening on `socket_path`
    pub fn with_socket_path(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Default::default()
        }
    }

    /// Where the configuration was last changed from
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the buffer cannot hold at
    /// least one byte plus the terminator or exceeds [`MAX_BUFFER_SIZE`], or
    /// the backlog is not positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size < 2 {
            return Err(ConfigError::ValidationError(format!(
                "buffer_size must be at least 2, got {}",
                self.buffer_size
            )));
        }
        if self.buffer_size > MAX_BUFFER_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "buffer_size must be at most {MAX_BUFFER_SIZE}, got {}",
                self.buffer_size
            )));
        }
        if self.backlog < 1 {
            return Err(ConfigError::ValidationError(format!(
                "backlog must be at least 1, got {}",
                self.backlog
            )));
        }
        if self.socket_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "socket_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from an optional TOML file, then the environment
///
/// A missing file is not an error (defaults are used).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed, or if
/// the resulting values are out of range.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ListenerConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config_from_path`] with an explicit environment lookup
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<ListenerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ListenerConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ChatsockToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    Ok(config)
}

fn apply_toml_config(config: &mut ListenerConfig, toml: &ChatsockToml) {
    if let Some(ref path) = toml.listener.socket_path {
        config.socket_path = PathBuf::from(path);
    }
    if let Some(backlog) = toml.listener.backlog {
        config.backlog = backlog;
    }
    if let Some(size) = toml.listener.buffer_size {
        config.buffer_size = size;
    }
}

fn apply_env_config<F>(config: &mut ListenerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env(ENV_SOCKET).filter(|v| !v.is_empty()) {
        config.socket_path = PathBuf::from(path);
        config.source = ConfigSource::Env;
    }
    if let Some(backlog) = env(ENV_BACKLOG).and_then(|v| v.parse().ok()) {
        config.backlog = backlog;
        config.source = ConfigSource::Env;
    }
    if let Some(size) = env(ENV_BUFFER_SIZE).and_then(|v| v.parse().ok()) {
        config.buffer_size = size;
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// CLI overrides applied on top of a loaded configuration
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Socket path override
    pub socket_path: Option<PathBuf>,
    /// Backlog override
    pub backlog: Option<i32>,
    /// Buffer size override
    pub buffer_size: Option<usize>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set socket path override
    #[must_use]
    pub fn with_socket_path(mut self, path: PathBuf) -> Self {
        self.socket_path = Some(path);
        self
    }

    /// Set backlog override
    #[must_use]
    pub fn with_backlog(mut self, backlog: i32) -> Self {
        self.backlog = Some(backlog);
        self
    }

    /// Set buffer size override
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = Some(size);
        self
    }

    /// Apply overrides and re-validate
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if an override is out of range.
    pub fn apply(&self, config: &mut ListenerConfig) -> Result<(), ConfigError> {
        if self.socket_path.is_some() || self.backlog.is_some() || self.buffer_size.is_some() {
            config.source = ConfigSource::Cli;
        }
        if let Some(ref path) = self.socket_path {
            config.socket_path = path.clone();
        }
        if let Some(backlog) = self.backlog {
            config.backlog = backlog;
        }
        if let Some(size) = self.buffer_size {
            config.buffer_size = size;
        }
        config.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
