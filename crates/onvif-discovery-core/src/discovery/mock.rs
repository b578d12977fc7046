//! Scripted sockets for exercising probers without a network.

use std::collections::VecDeque;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

use super::socket::{DiscoverySocket, SocketProvider};
use crate::protocol::envelope::tests::probe_matches_xml;

/// What a scripted peer sends back.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// ProbeMatches relating to the probe that was sent
    Correlated(String),
    /// ProbeMatches relating to some other probe
    Uncorrelated(String),
    /// Arbitrary bytes
    Raw(Vec<u8>),
}

impl Reply {
    fn render(&self, message_id: &Uuid) -> Vec<u8> {
        match self {
            Reply::Correlated(scopes) => {
                probe_matches_xml(&format!("uuid:{}", message_id), scopes).into_bytes()
            }
            Reply::Uncorrelated(scopes) => {
                probe_matches_xml(&format!("uuid:{}", Uuid::new_v4()), scopes).into_bytes()
            }
            Reply::Raw(bytes) => bytes.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct Scripted {
    after: Duration,
    from: SocketAddr,
    reply: Reply,
}

#[derive(Debug, Default)]
struct ScriptState {
    probed: Option<(Instant, Uuid)>,
    pending: VecDeque<Scripted>,
}

/// Observations shared with the test after the socket has been moved away.
#[derive(Debug, Default)]
pub(crate) struct SocketLog {
    pub sent: Mutex<Vec<Vec<u8>>>,
    pub closed: AtomicBool,
}

impl SocketLog {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

/// Socket that replays timed replies relative to the moment the probe is sent.
#[derive(Debug)]
pub(crate) struct ScriptedSocket {
    interface: IpAddr,
    state: Mutex<ScriptState>,
    fail_send: bool,
    hang_up_when_done: bool,
    closed: bool,
    log: Arc<SocketLog>,
}

impl ScriptedSocket {
    pub fn new(interface: &str) -> Self {
        Self {
            interface: interface.parse().unwrap(),
            state: Mutex::new(ScriptState::default()),
            fail_send: false,
            hang_up_when_done: false,
            closed: false,
            log: Arc::new(SocketLog::default()),
        }
    }

    /// Queue a reply arriving `after` the probe from `from`.
    pub fn reply(self, after: Duration, from: &str, reply: Reply) -> Self {
        self.state.lock().unwrap().pending.push_back(Scripted {
            after,
            from: from.parse().unwrap(),
            reply,
        });
        self
    }

    /// Fail every send with a transport error.
    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Report end of traffic once the script is exhausted instead of
    /// staying silent.
    pub fn hang_up_when_done(mut self) -> Self {
        self.hang_up_when_done = true;
        self
    }

    pub fn log(&self) -> Arc<SocketLog> {
        Arc::clone(&self.log)
    }
}

fn message_id_of(probe: &[u8]) -> Option<Uuid> {
    let text = std::str::from_utf8(probe).ok()?;
    let doc = roxmltree::Document::parse(text).ok()?;
    let id = doc
        .descendants()
        .find(|n| n.tag_name().name() == "MessageID")?
        .text()?;
    Uuid::parse_str(id.trim_start_matches("uuid:")).ok()
}

impl DiscoverySocket for ScriptedSocket {
    fn interface(&self) -> IpAddr {
        self.interface
    }

    async fn send_to(&self, payload: &[u8], _target: SocketAddr) -> io::Result<usize> {
        if self.fail_send {
            return Err(io::Error::new(
                io::ErrorKind::NetworkUnreachable,
                "network unreachable",
            ));
        }

        let message_id = message_id_of(payload)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a probe"))?;
        self.log.sent.lock().unwrap().push(payload.to_vec());
        self.state.lock().unwrap().probed = Some((Instant::now(), message_id));
        Ok(payload.len())
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed"));
        }

        let next = {
            let mut state = self.state.lock().unwrap();
            match state.probed {
                Some((sent_at, message_id)) => state
                    .pending
                    .pop_front()
                    .map(|s| (sent_at + s.after, s.from, s.reply.render(&message_id))),
                None => None,
            }
        };

        match next {
            Some((at, from, payload)) => {
                sleep_until(at).await;
                buf[..payload.len()].copy_from_slice(&payload);
                Ok((payload.len(), from))
            }
            None if self.hang_up_when_done => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "peer hung up",
            )),
            None => std::future::pending().await,
        }
    }

    fn close(&mut self) {
        self.closed = true;
        self.log.closed.store(true, Ordering::SeqCst);
    }
}

/// Hands out a fixed set of sockets once.
#[derive(Debug, Default)]
pub(crate) struct StaticProvider {
    sockets: Mutex<Vec<ScriptedSocket>>,
    calls: AtomicUsize,
    fail: bool,
}

impl StaticProvider {
    pub fn new(sockets: Vec<ScriptedSocket>) -> Self {
        Self {
            sockets: Mutex::new(sockets),
            ..Default::default()
        }
    }

    /// Provider whose interface enumeration fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SocketProvider for StaticProvider {
    type Socket = ScriptedSocket;

    fn sockets(&self) -> io::Result<Vec<ScriptedSocket>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot list interfaces",
            ));
        }
        Ok(std::mem::take(&mut *self.sockets.lock().unwrap()))
    }
}
