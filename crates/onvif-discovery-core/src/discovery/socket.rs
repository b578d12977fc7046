//! Per-interface UDP sockets.
//!
//! The engine talks to the network only through [`SocketProvider`] and
//! [`DiscoverySocket`], so interface enumeration and socket setup can be
//! swapped out (platform quirks, tests).

use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use crate::config::{DiscoveryConfig, DEFAULT_MULTICAST_TTL};

/// A datagram endpoint bound to one local interface.
pub trait DiscoverySocket: Send + Sync + 'static {
    /// Address of the interface the socket sends from.
    fn interface(&self) -> IpAddr;

    fn send_to(
        &self,
        payload: &[u8],
        target: SocketAddr,
    ) -> impl Future<Output = io::Result<usize>> + Send;

    /// Wait for the next datagram from any sender.
    fn recv_from(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = io::Result<(usize, SocketAddr)>> + Send;

    /// Release the socket. Must be idempotent.
    fn close(&mut self);
}

/// Supplies one socket per active local interface.
pub trait SocketProvider {
    type Socket: DiscoverySocket;

    fn sockets(&self) -> io::Result<Vec<Self::Socket>>;
}

/// Tokio UDP socket bound to a single IPv4 interface.
#[derive(Debug)]
pub struct InterfaceSocket {
    interface: Ipv4Addr,
    socket: Option<UdpSocket>,
}

impl InterfaceSocket {
    /// Bind a probe socket on `interface`. Must be called inside a tokio runtime.
    pub fn bind(interface: Ipv4Addr, multicast_ttl: u32) -> io::Result<Self> {
        let std_socket = create_probe_socket(interface, multicast_ttl)?;
        let socket = UdpSocket::from_std(std_socket)?;

        Ok(Self {
            interface,
            socket: Some(socket),
        })
    }

    fn socket(&self) -> io::Result<&UdpSocket> {
        self.socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket closed"))
    }
}

impl DiscoverySocket for InterfaceSocket {
    fn interface(&self) -> IpAddr {
        IpAddr::V4(self.interface)
    }

    async fn send_to(&self, payload: &[u8], target: SocketAddr) -> io::Result<usize> {
        self.socket()?.send_to(payload, target).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket()?.recv_from(buf).await
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::trace!(interface = %self.interface, "socket closed");
        }
    }
}

/// Create a UDP socket for sending multicast probes out of `interface`.
///
/// Binds to an ephemeral port on the interface address so unicast
/// ProbeMatches come back to this socket only. Multicast loopback is off so
/// the probe itself is not received.
pub fn create_probe_socket(
    interface: Ipv4Addr,
    multicast_ttl: u32,
) -> Result<std::net::UdpSocket, io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_reuse_address(true)?;
    socket.set_multicast_if_v4(&interface)?;
    socket.set_multicast_ttl_v4(multicast_ttl)?;
    socket.set_multicast_loop_v4(false)?;

    let addr = SocketAddr::new(IpAddr::V4(interface), 0);
    socket.bind(&addr.into())?;

    socket.set_nonblocking(true)?;

    Ok(socket.into())
}

/// Default provider: one [`InterfaceSocket`] per non-loopback IPv4 interface.
#[derive(Debug, Clone)]
pub struct UdpSocketProvider {
    allowed: Vec<Ipv4Addr>,
    multicast_ttl: u32,
}

impl Default for UdpSocketProvider {
    fn default() -> Self {
        Self {
            allowed: Vec::new(),
            multicast_ttl: DEFAULT_MULTICAST_TTL,
        }
    }
}

impl UdpSocketProvider {
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            allowed: config.interfaces.clone(),
            multicast_ttl: config.multicast_ttl,
        }
    }

    /// Only probe from the given interface addresses.
    pub fn with_interfaces(mut self, interfaces: Vec<Ipv4Addr>) -> Self {
        self.allowed = interfaces;
        self
    }

    fn is_allowed(&self, addr: &Ipv4Addr) -> bool {
        self.allowed.is_empty() || self.allowed.contains(addr)
    }
}

impl SocketProvider for UdpSocketProvider {
    type Socket = InterfaceSocket;

    fn sockets(&self) -> io::Result<Vec<InterfaceSocket>> {
        let mut sockets = Vec::new();

        for addr in local_ipv4_interfaces()? {
            if !self.is_allowed(&addr) {
                continue;
            }

            match InterfaceSocket::bind(addr, self.multicast_ttl) {
                Ok(socket) => sockets.push(socket),
                Err(e) => {
                    tracing::warn!(interface = %addr, error = %e, "skipping interface");
                }
            }
        }

        tracing::debug!(count = sockets.len(), "opened probe sockets");
        Ok(sockets)
    }
}

/// Non-loopback IPv4 addresses of the local interfaces.
pub fn local_ipv4_interfaces() -> io::Result<Vec<Ipv4Addr>> {
    let interfaces = local_ip_address::list_afinet_netifas().map_err(io::Error::other)?;
    Ok(select_ipv4(interfaces.into_iter().map(|(_name, ip)| ip)))
}

fn select_ipv4(addrs: impl Iterator<Item = IpAddr>) -> Vec<Ipv4Addr> {
    let mut v4: Vec<Ipv4Addr> = addrs
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
            _ => None,
        })
        .collect();
    v4.sort();
    v4.dedup();
    v4
}
