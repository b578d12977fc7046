//! Discovery configuration.
//!
//! Settings are read from an optional JSON file; every field has a default so
//! a partial file (or none at all) is valid.

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default collection window per interface
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default IP_MULTICAST_TTL, keeping probes on the local segment
pub const DEFAULT_MULTICAST_TTL: u32 = 1;

/// Default receive buffer, large enough for any UDP datagram
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 65535;

/// Smallest accepted receive buffer
const MIN_RECV_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoveryConfig {
    /// Per-interface collection window in seconds
    pub timeout_secs: u64,
    /// Restrict probing to these interface addresses (empty = all)
    pub interfaces: Vec<Ipv4Addr>,
    /// Multicast TTL for outgoing probes
    pub multicast_ttl: u32,
    /// Receive buffer length in bytes
    pub recv_buffer_size: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            interfaces: Vec::new(),
            multicast_ttl: DEFAULT_MULTICAST_TTL,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }
}

impl DiscoveryConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise the per-user default file if it
    /// exists, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match default_config_path() {
            Some(default_path) if default_path.is_file() => {
                tracing::debug!(path = %default_path.display(), "loading default config");
                Self::load(&default_path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeoutSecs must be greater than 0".to_string(),
            ));
        }

        if self.multicast_ttl == 0 {
            return Err(ConfigError::Invalid(
                "multicastTtl must be greater than 0".to_string(),
            ));
        }

        if self.recv_buffer_size < MIN_RECV_BUFFER_SIZE {
            return Err(ConfigError::Invalid(format!(
                "recvBufferSize must be at least {} bytes",
                MIN_RECV_BUFFER_SIZE
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Get the default config file location.
///
/// Uses the `directories` crate to find the platform-specific config
/// directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "onvif-discovery")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = DiscoveryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.interfaces.is_empty());
    }

    #[test]
    fn test_load_partial_file() {
        let file = write_config(r#"{"timeoutSecs": 3, "interfaces": ["192.168.1.20"]}"#);

        let config = DiscoveryConfig::load(file.path()).unwrap();

        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.interfaces, vec![Ipv4Addr::new(192, 168, 1, 20)]);
        assert_eq!(config.multicast_ttl, DEFAULT_MULTICAST_TTL);
        assert_eq!(config.recv_buffer_size, DEFAULT_RECV_BUFFER_SIZE);
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let file = write_config(r#"{"timeoutSecs": 0}"#);
        assert!(matches!(
            DiscoveryConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let file = write_config("{ timeoutSecs: ");
        assert!(matches!(
            DiscoveryConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            DiscoveryConfig::load_or_default(Some(&missing)),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_validate_small_buffer() {
        let config = DiscoveryConfig {
            recv_buffer_size: 512,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = DiscoveryConfig {
            timeout_secs: 10,
            interfaces: vec![Ipv4Addr::new(10, 0, 0, 1)],
            multicast_ttl: 2,
            recv_buffer_size: 8192,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"timeoutSecs\":10"));

        let parsed: DiscoveryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
