use dnstrace_application::use_cases::DirectQueryUseCase;
use dnstrace_domain::{Config, RecordType};
use dnstrace_infrastructure::UdpTransport;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

pub async fn query(
    config: &Config,
    nameserver: &str,
    name: &str,
    record_type: RecordType,
    recursive: bool,
) -> anyhow::Result<ExitCode> {
    let transport = Arc::new(UdpTransport::bind(&config.transport).await?);
    let use_case = DirectQueryUseCase::new(transport);

    match use_case.execute(nameserver, name, record_type, recursive).await {
        Ok(reply) => {
            super::print_json(&reply)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(nameserver, name, error = %e, "Query failed");
            super::print_json(&serde_json::json!({ "error": e.to_string() }))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
