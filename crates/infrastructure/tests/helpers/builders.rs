use dnstrace_domain::config::TransportConfig;
use dnstrace_domain::{Message, RData, ResourceRecord};
use std::net::Ipv4Addr;

pub fn test_transport_config(query_timeout_ms: u64) -> TransportConfig {
    TransportConfig {
        port: 53,
        query_timeout_ms,
        tcp_idle_timeout_ms: 1000,
        bind_address: "127.0.0.1".to_string(),
    }
}

/// Response skeleton echoing `request`.
pub fn reply_to(request: &Message) -> Message {
    let mut reply = Message::response_to(request);
    reply.flags.authoritative = true;
    reply
}

/// Authoritative reply with one A record for the first question.
pub fn a_answer(request: &Message, addr: Ipv4Addr) -> Message {
    let mut reply = reply_to(request);
    if let Some(question) = request.questions.first() {
        reply
            .records
            .push(ResourceRecord::new(question.domain.clone(), 60, RData::A(addr)));
    }
    reply
}
