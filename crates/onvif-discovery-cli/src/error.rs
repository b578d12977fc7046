//! Error types for the ONVIF discovery CLI.
//!
//! CliError wraps CoreError from the engine and adds CLI-specific variants.

use onvif_discovery_core::error::{CoreError, DiscoveryError};
use thiserror::Error;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const INVALID_ARGS: i32 = 4;
    pub const CANCELLED: i32 = 130;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No devices found")]
    NoDevicesFound,

    #[error("Discovery cancelled")]
    Cancelled,
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Discovery(DiscoveryError::InvalidTimeout) => exit_codes::INVALID_ARGS,
                CoreError::Discovery(_) => exit_codes::NETWORK_ERROR,
                CoreError::Config(_) => exit_codes::INVALID_ARGS,
            },
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::NoDevicesFound => exit_codes::GENERAL_ERROR,
            CliError::Cancelled => exit_codes::CANCELLED,
        }
    }
}

impl From<onvif_discovery_core::ConfigError> for CliError {
    fn from(e: onvif_discovery_core::ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}

impl From<regex::Error> for CliError {
    fn from(e: regex::Error) -> Self {
        CliError::InvalidArgument(format!("Invalid filter pattern: {}", e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
