//! DNS wire format (RFC 1035 section 4).
//!
//! Decoding understands label compression; encoding never compresses.
//! Every read is bounds-checked and fails with
//! [`DomainError::MalformedMessage`] rather than panicking.

mod rdata;
mod reader;
mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;

use dnstrace_domain::{
    DomainError, Message, MessageFlags, Opcode, Question, RecordType, ResourceRecord,
    ResponseCode, Section,
};

pub const HEADER_LEN: usize = 12;

const FLAG_RESPONSE: u16 = 0x8000;
const FLAG_AUTHORITATIVE: u16 = 0x0400;
const FLAG_TRUNCATED: u16 = 0x0200;
const FLAG_RECURSION_DESIRED: u16 = 0x0100;
const FLAG_RECURSION_AVAILABLE: u16 = 0x0080;
const OPCODE_SHIFT: u16 = 11;
const RCODE_MASK: u16 = 0x000F;

const SECTIONS: [Section; 3] = [Section::Answer, Section::Authority, Section::Additional];

fn pack_flags(message: &Message) -> u16 {
    let mut flags = ((message.opcode.to_u8() as u16) & 0x0F) << OPCODE_SHIFT;
    flags |= (message.response_code.to_u8() as u16) & RCODE_MASK;
    if message.flags.response {
        flags |= FLAG_RESPONSE;
    }
    if message.flags.authoritative {
        flags |= FLAG_AUTHORITATIVE;
    }
    if message.flags.truncated {
        flags |= FLAG_TRUNCATED;
    }
    if message.flags.recursive_query {
        flags |= FLAG_RECURSION_DESIRED;
    }
    if message.flags.recursion_available {
        flags |= FLAG_RECURSION_AVAILABLE;
    }
    flags
}

fn unpack_flags(raw: u16) -> (MessageFlags, Opcode, ResponseCode) {
    let flags = MessageFlags {
        response: raw & FLAG_RESPONSE != 0,
        authoritative: raw & FLAG_AUTHORITATIVE != 0,
        truncated: raw & FLAG_TRUNCATED != 0,
        recursive_query: raw & FLAG_RECURSION_DESIRED != 0,
        recursion_available: raw & FLAG_RECURSION_AVAILABLE != 0,
    };
    let opcode = Opcode::from_u8(((raw >> OPCODE_SHIFT) & 0x0F) as u8);
    let rcode = ResponseCode::from_u8((raw & RCODE_MASK) as u8);
    (flags, opcode, rcode)
}

fn section_count(len: usize, what: &str) -> Result<u16, DomainError> {
    u16::try_from(len).map_err(|_| {
        DomainError::MalformedMessage(format!("{} {} entries do not fit a u16 count", len, what))
    })
}

/// Serializes a message. Header counts are derived from the contents and
/// records are written grouped by section.
pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut writer = WireWriter::with_capacity(512);

    writer.write_u16(message.id);
    writer.write_u16(pack_flags(message));
    writer.write_u16(section_count(message.questions.len(), "question")?);
    for section in SECTIONS {
        writer.write_u16(section_count(message.count(section), "record")?);
    }

    for question in &message.questions {
        writer.write_name(&question.domain)?;
        writer.write_u16(question.record_type.to_u16());
        writer.write_u16(question.class);
    }

    for section in SECTIONS {
        for record in message.section(section) {
            write_record(&mut writer, record)?;
        }
    }

    Ok(writer.into_bytes())
}

fn write_record(writer: &mut WireWriter, record: &ResourceRecord) -> Result<(), DomainError> {
    writer.write_name(&record.domain)?;
    writer.write_u16(record.record_type.to_u16());
    writer.write_u16(record.class);
    writer.write_u32(record.ttl);

    let length_at = writer.len();
    writer.write_u16(0);
    rdata::write_rdata(writer, &record.rdata)?;
    let rdlength = writer.len() - length_at - 2;
    let rdlength = u16::try_from(rdlength).map_err(|_| {
        DomainError::MalformedMessage(format!(
            "RDATA of {} bytes for {} exceeds 65535",
            rdlength, record.domain
        ))
    })?;
    writer.patch_u16(length_at, rdlength)
}

/// Parses a complete message.
pub fn decode(bytes: &[u8]) -> Result<Message, DomainError> {
    let mut reader = WireReader::new(bytes);

    let id = reader.read_u16("header id")?;
    let raw_flags = reader.read_u16("header flags")?;
    let qdcount = reader.read_u16("question count")?;
    let ancount = reader.read_u16("answer count")?;
    let nscount = reader.read_u16("authority count")?;
    let arcount = reader.read_u16("additional count")?;
    let (flags, opcode, response_code) = unpack_flags(raw_flags);

    let mut questions = Vec::with_capacity(qdcount.min(16) as usize);
    for _ in 0..qdcount {
        let domain = reader.read_name()?;
        let record_type = RecordType::from_u16(reader.read_u16("question type")?);
        let class = reader.read_u16("question class")?;
        questions.push(Question {
            domain,
            record_type,
            class,
        });
    }

    let total = ancount as usize + nscount as usize + arcount as usize;
    let mut records = Vec::with_capacity(total.min(64));
    for (section, count) in SECTIONS.into_iter().zip([ancount, nscount, arcount]) {
        for _ in 0..count {
            records.push(read_record(&mut reader, section)?);
        }
    }

    Ok(Message {
        id,
        flags,
        opcode,
        response_code,
        questions,
        records,
    })
}

fn read_record(reader: &mut WireReader<'_>, section: Section) -> Result<ResourceRecord, DomainError> {
    let domain = reader.read_name()?;
    let record_type = RecordType::from_u16(reader.read_u16("record type")?);
    let class = reader.read_u16("record class")?;
    let ttl = reader.read_u32("record ttl")?;
    let rdlength = reader.read_u16("rdlength")? as usize;

    let start = reader.position();
    let end = start + rdlength;
    if end > reader.len() {
        return Err(DomainError::MalformedMessage(format!(
            "RDATA of {} ({} bytes at offset {}) runs past end of {}-byte message",
            domain,
            rdlength,
            start,
            reader.len()
        )));
    }

    let rdata = rdata::read_rdata(reader, record_type, end)?;
    if reader.position() > end {
        return Err(DomainError::MalformedMessage(format!(
            "{} RDATA of {} declared {} bytes but used {}",
            record_type,
            domain,
            rdlength,
            reader.position() - start
        )));
    }
    reader.seek(end)?;

    Ok(ResourceRecord {
        domain,
        record_type,
        class,
        ttl,
        section,
        rdata,
    })
}

/// Reads the transaction id and QR bit without decoding the rest.
pub fn peek_header(bytes: &[u8]) -> Option<(u16, bool)> {
    if bytes.len() < HEADER_LEN {
        return None;
    }
    let id = u16::from_be_bytes([bytes[0], bytes[1]]);
    let flags = u16::from_be_bytes([bytes[2], bytes[3]]);
    Some((id, flags & FLAG_RESPONSE != 0))
}
