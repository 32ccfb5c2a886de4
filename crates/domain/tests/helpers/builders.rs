#![allow(dead_code)]
use dnstrace_domain::{RData, ResourceRecord, Section};
use std::net::Ipv4Addr;

pub struct ResourceRecordBuilder {
    domain: String,
    ttl: u32,
    section: Section,
    rdata: RData,
}

impl ResourceRecordBuilder {
    pub fn new() -> Self {
        Self {
            domain: "example.com.".to_string(),
            ttl: 300,
            section: Section::Answer,
            rdata: RData::A(Ipv4Addr::new(192, 0, 2, 1)),
        }
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn rdata(mut self, rdata: RData) -> Self {
        self.rdata = rdata;
        self
    }

    pub fn build(self) -> ResourceRecord {
        ResourceRecord::new(self.domain, self.ttl, self.rdata).in_section(self.section)
    }
}
