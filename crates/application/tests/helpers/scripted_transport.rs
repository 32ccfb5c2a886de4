use async_trait::async_trait;
use dnstrace_application::ports::{DnsTransport, QueryOptions};
use dnstrace_domain::dns_name::names_equal;
use dnstrace_domain::{DomainError, Message, RecordType};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub server: String,
    pub name: String,
    pub record_type: RecordType,
    pub options: QueryOptions,
}

/// Answers from a fixed script keyed by (server, name, type). Anything not
/// scripted times out.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<(String, String, RecordType), Result<Message, DomainError>>>,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(server: &str, name: &str, record_type: RecordType) -> (String, String, RecordType) {
        (
            server.to_string(),
            name.trim_end_matches('.').to_ascii_lowercase(),
            record_type,
        )
    }

    pub fn reply(&self, server: &str, name: &str, record_type: RecordType, reply: Message) {
        self.script
            .lock()
            .unwrap()
            .insert(Self::key(server, name, record_type), Ok(reply));
    }

    pub fn fail(&self, server: &str, name: &str, record_type: RecordType, error: DomainError) {
        self.script
            .lock()
            .unwrap()
            .insert(Self::key(server, name, record_type), Err(error));
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn queries_to(&self, server: &str) -> usize {
        self.queries()
            .iter()
            .filter(|q| q.server == server)
            .count()
    }

    pub fn asked_about(&self, name: &str) -> bool {
        self.queries().iter().any(|q| names_equal(&q.name, name))
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn query(
        &self,
        server: &str,
        name: &str,
        record_type: RecordType,
        options: QueryOptions,
    ) -> Result<Message, DomainError> {
        self.queries.lock().unwrap().push(RecordedQuery {
            server: server.to_string(),
            name: name.to_string(),
            record_type,
            options,
        });

        self.script
            .lock()
            .unwrap()
            .get(&Self::key(server, name, record_type))
            .cloned()
            .unwrap_or_else(|| {
                Err(DomainError::Timeout {
                    server: server.to_string(),
                })
            })
    }
}
