use crate::ports::{DnsTransport, QueryOptions};
use dnstrace_domain::dns_name::{fqdn, is_valid_hostname};
use dnstrace_domain::{DomainError, Message, RecordType};
use std::sync::Arc;
use tracing::debug;

/// A single query to a named server, returning its raw reply.
pub struct DirectQueryUseCase {
    transport: Arc<dyn DnsTransport>,
}

impl DirectQueryUseCase {
    pub fn new(transport: Arc<dyn DnsTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute(
        &self,
        nameserver: &str,
        name: &str,
        record_type: RecordType,
        recursive: bool,
    ) -> Result<Message, DomainError> {
        let name = name.trim();
        if !is_valid_hostname(name) {
            return Err(DomainError::InvalidDomainName(name.to_string()));
        }
        let name = fqdn(name);

        debug!(nameserver, name = %name, record_type = %record_type, recursive, "Direct query");

        self.transport
            .query(nameserver, &name, record_type, QueryOptions { recursive })
            .await
    }
}
