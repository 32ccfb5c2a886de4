mod dns_transport;
mod query_sightings;

pub use dns_transport::{DnsTransport, QueryOptions};
pub use query_sightings::QuerySightings;
