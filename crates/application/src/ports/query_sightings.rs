use std::net::IpAddr;

/// Read-only view of which clients asked the responder about a name.
pub trait QuerySightings: Send + Sync {
    fn queries_seen_for(&self, name: &str) -> Vec<IpAddr>;
}
