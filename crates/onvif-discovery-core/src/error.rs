//! Error types for the discovery engine.

use std::net::IpAddr;

use thiserror::Error;

/// Core error type for public operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Discovery errors.
///
/// `Transport` is produced per interface and never escapes a
/// [`WsDiscovery::discover`](crate::discovery::WsDiscovery::discover) call;
/// the orchestrator logs it and carries on with the remaining interfaces.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Timeout must be at least one second")]
    InvalidTimeout,

    #[error("Failed to enumerate network interfaces: {0}")]
    InterfaceEnumeration(#[source] std::io::Error),

    #[error("Transport failure on {interface}: {source}")]
    Transport {
        interface: IpAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a datagram was rejected as a probe-match envelope.
///
/// Only used for logging; rejected datagrams are dropped silently.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("root element is <{0}>, not a SOAP Envelope")]
    NotAnEnvelope(String),

    #[error("envelope has no Body")]
    MissingBody,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
