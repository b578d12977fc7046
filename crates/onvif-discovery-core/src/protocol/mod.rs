//! WS-Discovery wire format.
//!
//! Builds outgoing Probe messages and parses incoming ProbeMatches envelopes,
//! including the informal metadata carried in the scopes string.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

pub mod envelope;
pub mod probe;
pub mod response;
pub mod scopes;

pub use envelope::{ProbeMatch, ProbeMatchEnvelope};
pub use probe::build_probe;
pub use response::parse_probe_response;

/// WS-Discovery IPv4 multicast group
pub const WS_DISCOVERY_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// WS-Discovery UDP port
pub const WS_DISCOVERY_PORT: u16 = 3702;

/// Destination for outgoing probes.
pub fn multicast_target() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(
        WS_DISCOVERY_MULTICAST_ADDR,
        WS_DISCOVERY_PORT,
    ))
}
