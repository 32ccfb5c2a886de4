pub mod dns;

pub use dns::{DirectQueryUseCase, LookupReport, QuerySightingsUseCase, TraceLookupUseCase};
