use dnstrace_domain::dns_name::{fqdn, is_within_zone, names_equal};
use dnstrace_domain::{Message, Nameserver, RData, RecordType, Section, TraceSink, CLASS_IN};
use std::net::IpAddr;

/// Nameservers a non-authoritative reply delegates `target` to.
///
/// Only NS records whose owner zone contains `target` count. Each target is
/// paired with A glue from the additional section when the reply has it.
pub fn referral_nameservers(
    reply: &Message,
    target: &str,
    trace: &dyn TraceSink,
) -> Vec<Nameserver> {
    let mut nameservers: Vec<Nameserver> = Vec::new();

    for record in &reply.records {
        if record.class != CLASS_IN || record.record_type != RecordType::NS {
            continue;
        }
        let RData::Ns(host) = &record.rdata else {
            continue;
        };
        if !is_within_zone(target, &record.domain) {
            trace.warn(format!(
                "Ignoring NS record for unrelated zone \"{}\"",
                record.domain
            ));
            continue;
        }

        let host = fqdn(host);
        if nameservers.iter().any(|ns| names_equal(&ns.name, &host)) {
            continue;
        }
        let glue = glue_address(reply, &host);
        nameservers.push(Nameserver::new(host, glue));
    }

    nameservers
}

fn glue_address(reply: &Message, host: &str) -> Option<IpAddr> {
    reply
        .section(Section::Additional)
        .filter(|record| record.answers(host, RecordType::A))
        .find_map(|record| match &record.rdata {
            RData::A(addr) => Some(IpAddr::V4(*addr)),
            _ => None,
        })
}
