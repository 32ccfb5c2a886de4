pub mod direct_query;
pub mod query_sightings;
pub mod trace_lookup;

pub use direct_query::DirectQueryUseCase;
pub use query_sightings::QuerySightingsUseCase;
pub use trace_lookup::{LookupReport, TraceLookupUseCase};
