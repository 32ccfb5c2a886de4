use crate::ports::QuerySightings;
use std::net::IpAddr;
use std::sync::Arc;

pub struct QuerySightingsUseCase {
    sightings: Arc<dyn QuerySightings>,
}

impl QuerySightingsUseCase {
    pub fn new(sightings: Arc<dyn QuerySightings>) -> Self {
        Self { sightings }
    }

    /// Clients that asked the responder about `name`, oldest first.
    pub fn execute(&self, name: &str) -> Vec<IpAddr> {
        self.sightings.queries_seen_for(name)
    }
}
