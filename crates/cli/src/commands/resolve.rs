use dnstrace_application::use_cases::TraceLookupUseCase;
use dnstrace_application::{IterativeResolver, ResolverSettings};
use dnstrace_domain::{Config, RecordType};
use dnstrace_infrastructure::UdpTransport;
use std::process::ExitCode;
use std::sync::Arc;

pub async fn resolve(
    config: &Config,
    name: &str,
    record_type: RecordType,
) -> anyhow::Result<ExitCode> {
    let transport = Arc::new(UdpTransport::bind(&config.transport).await?);
    let settings = ResolverSettings::from_config(&config.resolver)?;
    let resolver = Arc::new(IterativeResolver::new(transport, settings));

    let report = TraceLookupUseCase::new(resolver)
        .execute(name, record_type)
        .await;

    super::print_json(&report)?;

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
