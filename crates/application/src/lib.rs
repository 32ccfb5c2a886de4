//! dnstrace application layer: ports, the iterative resolver and use cases.
pub mod ports;
pub mod resolver;
pub mod use_cases;

pub use resolver::{IterativeResolver, ResolutionContext, ResolverSettings};
