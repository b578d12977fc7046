//! Discovery orchestration across all local interfaces.

use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::prober::InterfaceProber;
use super::socket::{DiscoverySocket, SocketProvider, UdpSocketProvider};
use crate::config::{DiscoveryConfig, DEFAULT_RECV_BUFFER_SIZE};
use crate::error::{DiscoveryError, Result};
use crate::types::DiscoveredDevice;

/// WS-Discovery client.
///
/// Each [`discover`](Self::discover) call probes every interface the provider
/// returns in parallel and merges the answers.
#[derive(Debug)]
pub struct WsDiscovery<P = UdpSocketProvider> {
    provider: P,
    recv_buffer_size: usize,
}

impl WsDiscovery<UdpSocketProvider> {
    /// Probe from every non-loopback IPv4 interface.
    pub fn new() -> Self {
        Self::with_provider(UdpSocketProvider::default())
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            provider: UdpSocketProvider::from_config(config),
            recv_buffer_size: config.recv_buffer_size,
        }
    }
}

impl Default for WsDiscovery<UdpSocketProvider> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SocketProvider> WsDiscovery<P> {
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }

    /// Discover devices answering within `timeout_secs` on each interface.
    ///
    /// Interfaces whose probe fails contribute nothing; the call only fails
    /// for a zero timeout or when no interface list can be obtained. If
    /// `cancel` fires, every interface still collecting returns no devices.
    pub async fn discover(
        &self,
        timeout_secs: u64,
        cancel: Option<CancellationToken>,
    ) -> Result<Vec<DiscoveredDevice>> {
        if timeout_secs == 0 {
            return Err(DiscoveryError::InvalidTimeout.into());
        }
        let timeout = Duration::from_secs(timeout_secs);
        let cancel = cancel.unwrap_or_default();

        let sockets = self
            .provider
            .sockets()
            .map_err(DiscoveryError::InterfaceEnumeration)?;

        let message_id = Uuid::new_v4();
        debug!(%message_id, interfaces = sockets.len(), ?timeout, "starting discovery");

        let mut probes = JoinSet::new();
        for socket in sockets {
            let interface = socket.interface();
            let prober = InterfaceProber::new(socket, message_id, timeout)
                .with_buffer_size(self.recv_buffer_size);
            let cancel = cancel.clone();
            probes.spawn(async move { (interface, prober.run(cancel).await) });
        }

        let mut devices = Vec::new();
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((interface, Ok(found))) => {
                    debug!(%interface, count = found.len(), "interface finished");
                    devices.extend(found);
                }
                Ok((interface, Err(e))) => {
                    warn!(%interface, error = %e, "interface probe failed");
                }
                Err(e) => {
                    warn!(error = %e, "interface probe task failed");
                }
            }
        }

        Ok(devices)
    }
}

/// Discover devices on all local interfaces with the default provider.
pub async fn discover(
    timeout_secs: u64,
    cancel: Option<CancellationToken>,
) -> Result<Vec<DiscoveredDevice>> {
    WsDiscovery::new().discover(timeout_secs, cancel).await
}
