pub mod rdata;
pub mod record;
pub mod record_type;

pub use rdata::{expanded_ipv6, RData, SoaData, SrvData};
pub use record::{ResourceRecord, Section, CLASS_IN};
pub use record_type::RecordType;
