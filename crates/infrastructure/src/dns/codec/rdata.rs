use super::reader::WireReader;
use super::writer::WireWriter;
use dnstrace_domain::{DomainError, RData, RecordType, SoaData, SrvData};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Parses the payload of one record. `end` is the offset where its RDATA
/// stops; the caller re-seeks there afterwards.
pub fn read_rdata(
    reader: &mut WireReader<'_>,
    record_type: RecordType,
    end: usize,
) -> Result<RData, DomainError> {
    let rdata = match record_type {
        RecordType::A => {
            let b = reader.read_bytes(4, "A address")?;
            RData::A(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
        }
        RecordType::AAAA => {
            let b = reader.read_bytes(16, "AAAA address")?;
            let mut octets = [0u8; 16];
            octets.copy_from_slice(b);
            RData::Aaaa(Ipv6Addr::from(octets))
        }
        RecordType::CNAME => RData::Cname(reader.read_name()?),
        RecordType::NS => RData::Ns(reader.read_name()?),
        RecordType::PTR => RData::Ptr(reader.read_name()?),
        RecordType::MX => {
            let preference = reader.read_u16("MX preference")?;
            RData::Mx {
                preference,
                exchange: reader.read_name()?,
            }
        }
        RecordType::SOA => RData::Soa(SoaData {
            mname: reader.read_name()?,
            rname: reader.read_name()?,
            serial: reader.read_u32("SOA serial")?,
            refresh: reader.read_u32("SOA refresh")?,
            retry: reader.read_u32("SOA retry")?,
            expire: reader.read_u32("SOA expire")?,
            minimum: reader.read_u32("SOA minimum")?,
        }),
        RecordType::SRV => RData::Srv(SrvData {
            priority: reader.read_u16("SRV priority")?,
            weight: reader.read_u16("SRV weight")?,
            port: reader.read_u16("SRV port")?,
            target: reader.read_name()?,
        }),
        RecordType::TXT => {
            let mut strings = Vec::new();
            while reader.position() < end {
                strings.push(reader.read_character_string()?);
            }
            if strings.is_empty() {
                return Err(DomainError::MalformedMessage(
                    "TXT record carries no character-strings".to_string(),
                ));
            }
            RData::Txt(strings)
        }
        RecordType::CAA => {
            let flags = reader.read_u8("CAA flags")?;
            RData::Caa {
                flags,
                issuer: reader.read_character_string()?,
            }
        }
        RecordType::Unknown(_) => {
            let len = end.saturating_sub(reader.position());
            RData::Opaque(reader.read_bytes(len, "opaque RDATA")?.to_vec())
        }
    };
    Ok(rdata)
}

pub fn write_rdata(writer: &mut WireWriter, rdata: &RData) -> Result<(), DomainError> {
    match rdata {
        RData::A(addr) => writer.write_bytes(&addr.octets()),
        RData::Aaaa(addr) => writer.write_bytes(&addr.octets()),
        RData::Cname(name) | RData::Ns(name) | RData::Ptr(name) => writer.write_name(name)?,
        RData::Mx {
            preference,
            exchange,
        } => {
            writer.write_u16(*preference);
            writer.write_name(exchange)?;
        }
        RData::Soa(soa) => {
            writer.write_name(&soa.mname)?;
            writer.write_name(&soa.rname)?;
            writer.write_u32(soa.serial);
            writer.write_u32(soa.refresh);
            writer.write_u32(soa.retry);
            writer.write_u32(soa.expire);
            writer.write_u32(soa.minimum);
        }
        RData::Srv(srv) => {
            writer.write_u16(srv.priority);
            writer.write_u16(srv.weight);
            writer.write_u16(srv.port);
            writer.write_name(&srv.target)?;
        }
        RData::Txt(strings) => {
            if strings.is_empty() {
                return Err(DomainError::MalformedMessage(
                    "TXT record needs at least one character-string".to_string(),
                ));
            }
            for s in strings {
                writer.write_character_string(s)?;
            }
        }
        RData::Caa { flags, issuer } => {
            writer.write_u8(*flags);
            writer.write_character_string(issuer)?;
        }
        RData::Opaque(bytes) => writer.write_bytes(bytes),
    }
    Ok(())
}
