//! Query transport: one shared UDP socket with TCP fallback on truncation.

mod address;
mod registry;
mod tcp;
mod udp;

pub use address::{parse_server, resolve_server, ServerSpec};
pub use registry::{PendingQuery, TransactionRegistry};
pub use tcp::query_tcp;
pub use udp::UdpTransport;

use async_trait::async_trait;
use dnstrace_application::ports::{DnsTransport, QueryOptions};
use dnstrace_domain::{DomainError, Message, Question, RecordType};
use std::net::SocketAddr;
use tracing::{debug, warn};

impl UdpTransport {
    /// Sends over UDP and repeats the same message over TCP when the UDP
    /// reply comes back truncated.
    pub async fn exchange(
        &self,
        server: SocketAddr,
        message: &Message,
    ) -> Result<Message, DomainError> {
        let reply = self.query_udp(server, message).await?;
        if !reply.flags.truncated {
            return Ok(reply);
        }

        debug!(server = %server, id = reply.id, "UDP reply truncated, retrying over TCP");

        let mut retry = message.clone();
        retry.id = reply.id;
        match query_tcp(server, &retry, self.tcp_idle_timeout).await {
            Ok(tcp_reply) if tcp_reply.flags.truncated => Err(DomainError::PersistentTruncation {
                server: server.to_string(),
            }),
            Ok(tcp_reply) => Ok(tcp_reply),
            Err(e) => {
                warn!(server = %server, error = %e, "TCP retry after truncation failed");
                Err(DomainError::TruncatedUnconfirmable {
                    server: server.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn query(
        &self,
        server: &str,
        name: &str,
        record_type: RecordType,
        options: QueryOptions,
    ) -> Result<Message, DomainError> {
        let addr = resolve_server(server, self.default_port, self.is_ipv4()).await?;
        let message = Message::query(0, Question::new(name, record_type), options.recursive);
        self.exchange(addr, &message).await
    }
}
