use super::dns_record::{RecordType, CLASS_IN};
use serde::Serialize;

/// One entry of a message's question section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub domain: String,
    pub record_type: RecordType,
    pub class: u16,
}

impl Question {
    pub fn new(domain: impl Into<String>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            class: CLASS_IN,
        }
    }
}
