//! Per-interface probe round.
//!
//! Sends one Probe out of a single socket, collects answers until the
//! deadline passes or the caller cancels, then turns them into devices.

use std::collections::HashSet;
use std::io;
use std::net::IpAddr;
use std::ops::Deref;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};
use uuid::Uuid;

use super::socket::DiscoverySocket;
use crate::config::DEFAULT_RECV_BUFFER_SIZE;
use crate::error::DiscoveryError;
use crate::protocol::{build_probe, multicast_target, parse_probe_response};
use crate::types::{DiscoveredDevice, RawResponse};

/// Why the receive loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEnd {
    TimedOut,
    Cancelled,
    NoMoreTraffic,
}

/// Closes the wrapped socket when dropped, whichever way the round ends.
struct CloseOnDrop<S: DiscoverySocket>(S);

impl<S: DiscoverySocket> Deref for CloseOnDrop<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.0
    }
}

impl<S: DiscoverySocket> Drop for CloseOnDrop<S> {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// One probe/collect cycle on one interface.
pub struct InterfaceProber<S: DiscoverySocket> {
    socket: CloseOnDrop<S>,
    message_id: Uuid,
    timeout: Duration,
    buffer_size: usize,
}

impl<S: DiscoverySocket> InterfaceProber<S> {
    pub fn new(socket: S, message_id: Uuid, timeout: Duration) -> Self {
        Self {
            socket: CloseOnDrop(socket),
            message_id,
            timeout,
            buffer_size: DEFAULT_RECV_BUFFER_SIZE,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Run the round to completion.
    ///
    /// Cancellation discards everything collected so far and yields an empty
    /// list; a timeout keeps what arrived. Transport failures are returned so
    /// the caller can decide how to contain them.
    pub async fn run(self, cancel: CancellationToken) -> Result<Vec<DiscoveredDevice>, DiscoveryError> {
        let Self {
            socket,
            message_id,
            timeout,
            buffer_size,
        } = self;
        let interface = socket.interface();
        let transport = |source: io::Error| DiscoveryError::Transport { interface, source };

        let probe = build_probe(&message_id);
        socket
            .send_to(&probe, multicast_target())
            .await
            .map_err(transport)?;
        debug!(%interface, %message_id, "probe sent");

        let (responses, end) = collect(&*socket, timeout, &cancel, buffer_size)
            .await
            .map_err(transport)?;
        drop(socket);

        debug!(%interface, ?end, responses = responses.len(), "collection finished");

        if cancel.is_cancelled() {
            return Ok(Vec::new());
        }

        Ok(responses
            .iter()
            .filter_map(|raw| parse_probe_response(raw, &message_id))
            .collect())
    }
}

/// Receive until the deadline, cancellation, or end of traffic.
///
/// Keeps the first datagram from each sender address; later ones from the
/// same address are dropped.
async fn collect<S: DiscoverySocket>(
    socket: &S,
    timeout: Duration,
    cancel: &CancellationToken,
    buffer_size: usize,
) -> io::Result<(Vec<RawResponse>, CollectionEnd)> {
    let deadline = Instant::now() + timeout;
    let mut seen: HashSet<IpAddr> = HashSet::new();
    let mut responses = Vec::new();
    let mut buf = vec![0u8; buffer_size];

    loop {
        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok((responses, CollectionEnd::Cancelled)),
            _ = sleep_until(deadline) => return Ok((responses, CollectionEnd::TimedOut)),
            received = socket.recv_from(&mut buf) => received,
        };

        match received {
            Ok((len, source)) => {
                if seen.insert(source.ip()) {
                    responses.push(RawResponse {
                        payload: buf[..len].to_vec(),
                        source,
                    });
                } else {
                    trace!(%source, "dropping duplicate response");
                }
            }
            Err(e) if is_end_of_traffic(&e) => {
                return Ok((responses, CollectionEnd::NoMoreTraffic));
            }
            Err(e) if is_transient(&e) => {
                trace!(error = %e, "ignoring transient receive error");
            }
            Err(e) => return Err(e),
        }
    }
}

fn is_end_of_traffic(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotConnected | io::ErrorKind::BrokenPipe
    )
}

// Windows reports ICMP port-unreachable for earlier sends as a reset on the
// next receive.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::ConnectionReset
    )
}
