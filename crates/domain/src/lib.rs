//! dnstrace domain layer
pub mod config;
pub mod dns_message;
pub mod dns_name;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod nameserver;
pub mod trace;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_message::{Message, MessageFlags, Opcode, ResponseCode};
pub use dns_query::Question;
pub use dns_record::{RData, RecordType, ResourceRecord, Section, SoaData, SrvData, CLASS_IN};
pub use errors::DomainError;
pub use nameserver::{root_servers, Nameserver};
pub use trace::{TraceEntry, TraceLevel, TraceLog, TraceSink};
