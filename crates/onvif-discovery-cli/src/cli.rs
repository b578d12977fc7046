//! CLI argument definitions using clap.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ONVIF Discovery CLI - find network cameras via WS-Discovery
#[derive(Parser, Debug)]
#[command(name = "onvif-discovery-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON)
    #[arg(long, global = true, env = "ONVIF_DISCOVERY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the local network for ONVIF devices
    Discover(DiscoverArgs),
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Collection window per interface in seconds (overrides config)
    #[arg(short, long, env = "ONVIF_DISCOVERY_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Only probe from this interface address (repeatable, overrides config)
    #[arg(short, long = "interface", value_name = "IP")]
    pub interfaces: Vec<Ipv4Addr>,

    /// Only show devices whose model matches this regex (case-insensitive)
    #[arg(long, value_name = "REGEX")]
    pub filter_model: Option<String>,

    /// Only show devices whose manufacturer matches this regex (case-insensitive)
    #[arg(long, value_name = "REGEX")]
    pub filter_mfr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_discover_defaults() {
        let cli = Cli::try_parse_from(["onvif-discovery-cli", "discover"]).unwrap();
        let Commands::Discover(args) = cli.command;

        assert!(!cli.json);
        assert!(args.interfaces.is_empty());
        assert!(args.filter_model.is_none());
    }

    #[test]
    fn test_parse_discover_options() {
        let cli = Cli::try_parse_from([
            "onvif-discovery-cli",
            "--json",
            "discover",
            "--timeout",
            "3",
            "-i",
            "192.168.1.20",
            "-i",
            "10.0.0.2",
            "--filter-mfr",
            "acme|axis",
        ])
        .unwrap();
        let Commands::Discover(args) = cli.command;

        assert!(cli.json);
        assert_eq!(args.timeout, Some(3));
        assert_eq!(
            args.interfaces,
            vec![Ipv4Addr::new(192, 168, 1, 20), Ipv4Addr::new(10, 0, 0, 2)]
        );
        assert_eq!(args.filter_mfr.as_deref(), Some("acme|axis"));
    }

    #[test]
    fn test_rejects_invalid_interface() {
        let result = Cli::try_parse_from(["onvif-discovery-cli", "discover", "-i", "eth0"]);
        assert!(result.is_err());
    }
}
