//! UDP transport (RFC 1035 §4.2.1)
//!
//! A single socket serves every query issued through the transport. One
//! background task reads all inbound datagrams and hands each reply to the
//! pending query with the matching transaction id.

use super::registry::TransactionRegistry;
use crate::dns::codec;
use dnstrace_domain::config::TransportConfig;
use dnstrace_domain::{DomainError, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Largest datagram the receive loop accepts.
const MAX_UDP_RESPONSE_SIZE: usize = 65535;

const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    registry: Arc<TransactionRegistry>,
    pub(super) default_port: u16,
    query_timeout: Duration,
    pub(super) tcp_idle_timeout: Duration,
    receive_loop: JoinHandle<()>,
}

impl UdpTransport {
    /// Binds the shared socket on an ephemeral port and starts the receive loop.
    pub async fn bind(config: &TransportConfig) -> Result<Self, DomainError> {
        let bind_addr: SocketAddr = format!("{}:0", config.bind_address)
            .parse::<SocketAddr>()
            .or_else(|_| format!("[{}]:0", config.bind_address).parse::<SocketAddr>())
            .map_err(|_| {
                DomainError::Io(format!("invalid bind address '{}'", config.bind_address))
            })?;

        let socket = Arc::new(UdpSocket::bind(bind_addr).await?);
        let registry = Arc::new(TransactionRegistry::new());

        info!(local_addr = %socket.local_addr()?, "DNS transport socket bound");

        let receive_loop = tokio::spawn(receive_loop(Arc::clone(&socket), Arc::clone(&registry)));

        Ok(Self {
            socket,
            registry,
            default_port: config.port,
            query_timeout: config.query_timeout(),
            tcp_idle_timeout: config.tcp_idle_timeout(),
            receive_loop,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        Ok(self.socket.local_addr()?)
    }

    pub(super) fn is_ipv4(&self) -> bool {
        self.socket
            .local_addr()
            .map(|addr| addr.is_ipv4())
            .unwrap_or(true)
    }

    /// Queries currently waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.registry.len()
    }

    /// Sends `message` under a freshly allocated id and waits for the
    /// matching reply or the query timeout. The returned reply carries the
    /// allocated id.
    pub async fn query_udp(
        &self,
        server: SocketAddr,
        message: &Message,
    ) -> Result<Message, DomainError> {
        let deadline = Instant::now() + self.query_timeout;
        let (id, reply) = self.registry.register(server.to_string(), deadline)?;

        let mut outgoing = message.clone();
        outgoing.id = id;
        let bytes = match codec::encode(&outgoing) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.registry.remove(id);
                return Err(e);
            }
        };

        if let Err(e) = self.socket.send_to(&bytes, server).await {
            self.registry.remove(id);
            return Err(e.into());
        }

        debug!(server = %server, id, bytes_sent = bytes.len(), "UDP query sent");

        match tokio::time::timeout_at(deadline, reply).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(DomainError::Io(format!(
                "transaction {} to {} was abandoned",
                id, server
            ))),
            Err(_) => {
                self.registry.remove(id);
                debug!(server = %server, id, "UDP query timed out");
                Err(DomainError::Timeout {
                    server: server.to_string(),
                })
            }
        }
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        self.receive_loop.abort();
    }
}

async fn receive_loop(socket: Arc<UdpSocket>, registry: Arc<TransactionRegistry>) {
    let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    let mut sweep = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, from)) => dispatch(&registry, &buf[..len], from),
                Err(e) => {
                    warn!(error = %e, "UDP receive failed");
                }
            },
            _ = sweep.tick() => {
                registry.sweep_expired(Instant::now());
            }
        }
    }
}

/// Routes one datagram to its waiter. A response for an outstanding id that
/// fails to decode rejects that waiter; anything else unusable is dropped.
fn dispatch(registry: &TransactionRegistry, datagram: &[u8], from: SocketAddr) {
    let message = match codec::decode(datagram) {
        Ok(message) => message,
        Err(e) => {
            match codec::peek_header(datagram) {
                Some((id, true)) if registry.reject(id, e.clone()) => {
                    debug!(from = %from, id, error = %e, "Malformed reply for pending transaction");
                }
                _ => debug!(from = %from, error = %e, "Discarding undecodable datagram"),
            }
            return;
        }
    };

    if !message.flags.response {
        debug!(from = %from, id = message.id, "Discarding datagram without QR bit");
        return;
    }

    let id = message.id;
    if !registry.complete(id, message) {
        debug!(from = %from, id, "Discarding reply for unknown transaction");
    } else {
        debug!(from = %from, id, bytes_received = datagram.len(), "UDP response received");
    }
}
