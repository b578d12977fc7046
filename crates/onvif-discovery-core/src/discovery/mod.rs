//! WS-Discovery probe engine.
//!
//! Fans a correlated Probe out over every local interface, collects
//! ProbeMatches until a per-interface deadline or external cancellation, and
//! returns the devices that answered.

#[cfg(test)]
mod mock;
pub mod prober;
pub mod service;
pub mod socket;

pub use prober::{CollectionEnd, InterfaceProber};
pub use service::{discover, WsDiscovery};
pub use socket::{DiscoverySocket, InterfaceSocket, SocketProvider, UdpSocketProvider};
