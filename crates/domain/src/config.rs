pub mod errors;
pub mod logging;
pub mod resolver;
pub mod responder;
pub mod root;
pub mod transport;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::ResolverConfig;
pub use responder::ResponderConfig;
pub use root::{CliOverrides, Config};
pub use transport::TransportConfig;
