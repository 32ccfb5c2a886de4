use super::{RData, RecordType};
use crate::dns_name::names_equal;
use serde::Serialize;
use std::fmt;

pub const CLASS_IN: u16 = 1;

/// Message section a record was read from. Assigned from the header counts
/// while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    pub domain: String,

    pub record_type: RecordType,

    pub class: u16,

    pub ttl: u32,

    pub section: Section,

    pub rdata: RData,
}

impl ResourceRecord {
    pub fn new(domain: impl Into<String>, ttl: u32, rdata: RData) -> Self {
        let record_type = match &rdata {
            RData::A(_) => RecordType::A,
            RData::Aaaa(_) => RecordType::AAAA,
            RData::Cname(_) => RecordType::CNAME,
            RData::Ns(_) => RecordType::NS,
            RData::Ptr(_) => RecordType::PTR,
            RData::Mx { .. } => RecordType::MX,
            RData::Soa(_) => RecordType::SOA,
            RData::Srv(_) => RecordType::SRV,
            RData::Txt(_) => RecordType::TXT,
            RData::Caa { .. } => RecordType::CAA,
            RData::Opaque(_) => RecordType::Unknown(0),
        };

        Self {
            domain: domain.into(),
            record_type,
            class: CLASS_IN,
            ttl,
            section: Section::Answer,
            rdata,
        }
    }

    pub fn in_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn with_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    /// True when owner name, type and class IN all match.
    pub fn answers(&self, name: &str, record_type: RecordType) -> bool {
        self.class == CLASS_IN && self.record_type == record_type && names_equal(&self.domain, name)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.class == CLASS_IN {
            "IN".to_string()
        } else {
            format!("CLASS{}", self.class)
        };
        write!(
            f,
            "{} {} {} {} {}",
            self.domain, self.ttl, class, self.record_type, self.rdata
        )
    }
}
