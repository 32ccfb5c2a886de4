use async_trait::async_trait;
use dnstrace_domain::{DomainError, Message, RecordType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Sets RD on the outgoing query.
    pub recursive: bool,
}

impl QueryOptions {
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

/// One request/reply exchange with a nameserver.
///
/// `server` is an address or hostname, optionally with a port. The reply is
/// returned whatever its response code; only transport and decode failures
/// are errors.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn query(
        &self,
        server: &str,
        name: &str,
        record_type: RecordType,
        options: QueryOptions,
    ) -> Result<Message, DomainError>;
}
