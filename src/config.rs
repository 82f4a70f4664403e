//! Probe configuration.
//!
//! This module defines the tunables of the TLS probe and optionally loads
//! them from a TOML file. The timeout is threaded explicitly through the
//! probe rather than living as a hidden constant, so it stays testable and
//! tunable.
//!
//! # Example Configuration File
//!
//! ```toml
//! timeout_secs = 10
//! port = 443
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    10
}

fn default_port() -> u16 {
    443
}

/// Tunables for a single probe attempt.
///
/// The defaults match the probe's public contract: one connection attempt
/// to `target:443`, bounded by a 10 second timeout. The port is
/// configurable so tests can point the probe at a local server on an
/// ephemeral port.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Connect/handshake timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// TCP port appended to every target
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            timeout_secs: default_timeout_secs(),
            port: default_port(),
        }
    }
}

impl ProbeConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults. A zero timeout is rejected
    /// as a validation error because the probe requires a positive bound.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - file could not be read
    /// * `ConfigError::Parse` - file contains invalid TOML
    /// * `ConfigError::Validation` - timeout is zero
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: ProbeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be positive".to_string(),
            ));
        }

        Ok(config)
    }

    /// The probe timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Errors that can occur during configuration loading and parsing.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error (file not found, permission denied, etc.)
    Io(String),
    /// TOML parsing error (invalid syntax, type mismatch, etc.)
    Parse(String),
    /// Validation error (non-positive timeout, etc.)
    Validation(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO Error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
            timeout_secs = 3
            port = 8443
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ProbeConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.port, 8443);
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_defaults() {
        let config = ProbeConfig::default();

        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.port, 443);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let toml_content = "timeout_secs = 5\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ProbeConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.port, 443); // Not specified, default applies
    }

    #[test]
    fn test_invalid_toml() {
        let invalid_toml = "timeout_secs = [invalid toml";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(invalid_toml.as_bytes()).unwrap();

        let result = ProbeConfig::from_file(temp_file.path());

        match result.unwrap_err() {
            ConfigError::Parse(_) => {} // Expected
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let toml_content = "timeout_secs = 0\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let result = ProbeConfig::from_file(temp_file.path());

        match result.unwrap_err() {
            ConfigError::Validation(_) => {} // Expected
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ProbeConfig::from_file("/nonexistent/tlsprobe.toml");

        match result.unwrap_err() {
            ConfigError::Io(_) => {} // Expected
            other => panic!("Expected IoError, got {:?}", other),
        }
    }
}
