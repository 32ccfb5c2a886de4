//! Minimal authoritative responder.
//!
//! Answers every A question with one fixed address and remembers which
//! clients asked. Other question types are echoed without answers.

mod tracker;

pub use tracker::QueryTracker;

use crate::dns::codec;
use dnstrace_domain::config::ResponderConfig;
use dnstrace_domain::{DomainError, Message, RData, RecordType, ResourceRecord, Section};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

const MAX_QUERY_SIZE: usize = 4096;

pub struct AuthoritativeResponder {
    socket: UdpSocket,
    answer_address: Ipv4Addr,
    answer_ttl: u32,
    tracker: Arc<QueryTracker>,
}

impl AuthoritativeResponder {
    pub async fn bind(
        config: &ResponderConfig,
        tracker: Arc<QueryTracker>,
    ) -> Result<Self, DomainError> {
        let answer_address: Ipv4Addr = config.answer_address.parse().map_err(|_| {
            DomainError::Io(format!(
                "invalid responder answer address '{}'",
                config.answer_address
            ))
        })?;
        let bind_addr = if config.bind_address.contains(':') {
            format!("[{}]:{}", config.bind_address, config.port)
        } else {
            format!("{}:{}", config.bind_address, config.port)
        };
        let socket = UdpSocket::bind(bind_addr.as_str()).await?;

        info!(local_addr = %socket.local_addr()?, answer = %answer_address, "Authoritative responder listening");

        Ok(Self {
            socket,
            answer_address,
            answer_ttl: config.answer_ttl,
            tracker,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn tracker(&self) -> Arc<QueryTracker> {
        Arc::clone(&self.tracker)
    }

    /// Serves until the task is dropped. Receive errors are logged and skipped.
    pub async fn run(self) {
        let mut buf = [0u8; MAX_QUERY_SIZE];
        loop {
            let (len, from) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "Responder receive failed");
                    continue;
                }
            };

            let request = match codec::decode(&buf[..len]) {
                Ok(request) => request,
                Err(e) => {
                    warn!(client = %from, error = %e, "Dropping undecodable query");
                    continue;
                }
            };

            let response = self.answer(&request, from);
            match codec::encode(&response) {
                Ok(bytes) => {
                    if let Err(e) = self.socket.send_to(&bytes, from).await {
                        warn!(client = %from, error = %e, "Failed to send response");
                    }
                }
                Err(e) => warn!(client = %from, error = %e, "Failed to encode response"),
            }
        }
    }

    /// Builds the reply for `request` and records the A lookups it carries.
    pub fn answer(&self, request: &Message, from: SocketAddr) -> Message {
        let mut response = Message::response_to(request);
        response.flags.authoritative = true;

        for question in &request.questions {
            if question.record_type != RecordType::A {
                continue;
            }
            debug!(client = %from, name = %question.domain, "Answering A query");
            response.records.push(
                ResourceRecord::new(
                    question.domain.clone(),
                    self.answer_ttl,
                    RData::A(self.answer_address),
                )
                .in_section(Section::Answer),
            );
            self.tracker.record(&question.domain, from.ip());
        }

        response
    }
}
