use dnstrace_application::use_cases::QuerySightingsUseCase;
use dnstrace_domain::Config;
use dnstrace_infrastructure::{AuthoritativeResponder, QueryTracker};
use serde::Serialize;
use std::net::IpAddr;
use std::num::NonZeroUsize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Serialize)]
struct Sighting {
    name: String,
    clients: Vec<IpAddr>,
}

pub async fn serve(config: &Config, watch: &[String]) -> anyhow::Result<ExitCode> {
    let capacity = NonZeroUsize::new(config.responder.tracked_names)
        .ok_or_else(|| anyhow::anyhow!("responder.tracked_names must be at least 1"))?;
    let tracker = Arc::new(QueryTracker::new(
        capacity,
        config.responder.sightings_ttl(),
    ));
    let sightings = QuerySightingsUseCase::new(tracker.clone());

    let responder = AuthoritativeResponder::bind(&config.responder, tracker).await?;
    info!(addr = %responder.local_addr()?, "Responder ready, press Ctrl-C to stop");

    tokio::select! {
        _ = responder.run() => {
            error!("Responder stopped");
            return Ok(ExitCode::FAILURE);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down responder");
        }
    }

    if !watch.is_empty() {
        let report: Vec<Sighting> = watch
            .iter()
            .map(|name| Sighting {
                name: name.clone(),
                clients: sightings.execute(name),
            })
            .collect();
        super::print_json(&report)?;
    }

    Ok(ExitCode::SUCCESS)
}
