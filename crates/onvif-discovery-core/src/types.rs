//! Type definitions shared across the discovery engine.

use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Represents a device that answered a WS-Discovery probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredDevice {
    /// Sender address of the ProbeMatches datagram
    pub address: IpAddr,
    /// Hardware model from the `hardware/` scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Manufacturer from the `mfr/` or `name/` scope, empty when neither is advertised
    pub manufacturer: String,
    /// Service endpoints advertised in XAddrs
    pub xaddrs: Vec<String>,
    /// Type QNames advertised in Types
    pub types: Vec<String>,
}

impl DiscoveredDevice {
    /// First advertised XAddr, normally the ONVIF device service endpoint.
    pub fn service_address(&self) -> Option<&str> {
        self.xaddrs.first().map(String::as_str)
    }

    /// Whether the device advertises the ONVIF NetworkVideoTransmitter type.
    pub fn is_network_video_transmitter(&self) -> bool {
        self.types
            .iter()
            .any(|t| t.rsplit(':').next() == Some("NetworkVideoTransmitter"))
    }
}

/// A datagram received during a probe round, held only until it is parsed.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub payload: Vec<u8>,
    pub source: SocketAddr,
}
