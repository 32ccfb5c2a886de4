use crate::resolver::IterativeResolver;
use dnstrace_domain::dns_name::{fqdn, is_valid_hostname};
use dnstrace_domain::{DomainError, RecordType, ResourceRecord, TraceEntry, TraceLog};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a traced lookup, shaped for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub name: String,
    pub record_type: RecordType,
    pub records: Vec<ResourceRecord>,
    pub trace: Vec<TraceEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub struct TraceLookupUseCase {
    resolver: Arc<IterativeResolver>,
}

impl TraceLookupUseCase {
    pub fn new(resolver: Arc<IterativeResolver>) -> Self {
        Self { resolver }
    }

    /// Never fails: problems end up in `error` next to the trace collected
    /// up to that point.
    pub async fn execute(&self, name: &str, record_type: RecordType) -> LookupReport {
        let name = name.trim();
        if !is_valid_hostname(name) {
            let error = DomainError::InvalidDomainName(format!(
                "\"{}\" may only contain letters, digits, dots and hyphens",
                name
            ));
            return LookupReport {
                name: name.to_string(),
                record_type,
                records: Vec::new(),
                trace: Vec::new(),
                error: Some(error.to_string()),
            };
        }

        let name = fqdn(name);
        let trace = TraceLog::new();
        let result = self.resolver.resolve(&name, record_type, &trace).await;

        let (records, error) = match result {
            Ok(records) => {
                info!(name = %name, record_type = %record_type, records = records.len(), "Lookup finished");
                (records, None)
            }
            Err(e) => {
                warn!(name = %name, record_type = %record_type, error = %e, "Lookup failed");
                (Vec::new(), Some(e.to_string()))
            }
        };

        LookupReport {
            name,
            record_type,
            records,
            trace: trace.into_entries(),
            error,
        }
    }
}
