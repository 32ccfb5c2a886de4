use dnstrace_domain::{
    DomainError, Message, Opcode, Question, RData, RecordType, ResourceRecord, ResponseCode,
    Section, SoaData, SrvData,
};
use dnstrace_infrastructure::dns::codec::{decode, encode};
use std::net::{Ipv4Addr, Ipv6Addr};

fn response_with(records: Vec<ResourceRecord>) -> Message {
    let mut msg = Message::query(0xBEEF, Question::new("example.com.", RecordType::A), true);
    msg.flags.response = true;
    msg.flags.authoritative = true;
    msg.flags.recursion_available = true;
    msg.records = records;
    msg
}

fn every_record_type() -> Vec<ResourceRecord> {
    vec![
        ResourceRecord::new("example.com.", 300, RData::A(Ipv4Addr::new(93, 184, 216, 34))),
        ResourceRecord::new(
            "example.com.",
            300,
            RData::Aaaa("2606:2800:220:1:248:1893:25c8:1946".parse().unwrap()),
        ),
        ResourceRecord::new("www.example.com.", 60, RData::Cname("example.com.".into())),
        ResourceRecord::new("34.216.184.93.in-addr.arpa.", 60, RData::Ptr("example.com.".into())),
        ResourceRecord::new(
            "example.com.",
            3600,
            RData::Mx {
                preference: 10,
                exchange: "mail.example.com.".into(),
            },
        ),
        ResourceRecord::new(
            "example.com.",
            3600,
            RData::Txt(vec!["v=spf1 -all".into(), "second string".into()]),
        ),
        ResourceRecord::new(
            "example.com.",
            3600,
            RData::Caa {
                flags: 128,
                issuer: "issue".into(),
            },
        ),
        ResourceRecord::new("example.com.", 86400, RData::Ns("a.iana-servers.net.".into()))
            .in_section(Section::Authority),
        ResourceRecord::new(
            "example.com.",
            3600,
            RData::Soa(SoaData {
                mname: "ns.icann.org.".into(),
                rname: "noc.dns.icann.org.".into(),
                serial: 2024010101,
                refresh: 7200,
                retry: 3600,
                expire: 1209600,
                minimum: 3600,
            }),
        )
        .in_section(Section::Authority),
        ResourceRecord::new(
            "_sip._tcp.example.com.",
            60,
            RData::Srv(SrvData {
                priority: 10,
                weight: 60,
                port: 5060,
                target: "sip.example.com.".into(),
            }),
        )
        .in_section(Section::Additional),
        ResourceRecord::new("example.com.", 60, RData::Opaque(vec![1, 2, 3, 4, 5]))
            .with_type(RecordType::Unknown(65280))
            .in_section(Section::Additional),
    ]
}

#[test]
fn test_round_trip_every_record_type() {
    let msg = response_with(every_record_type());
    let decoded = decode(&encode(&msg).unwrap()).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_header_counts_follow_sections() {
    let msg = response_with(every_record_type());
    let bytes = encode(&msg).unwrap();
    let count = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);
    assert_eq!(count(4), 1);
    assert_eq!(count(6), 7);
    assert_eq!(count(8), 2);
    assert_eq!(count(10), 2);
}

#[test]
fn test_records_out_of_section_order_are_grouped_on_encode() {
    let additional =
        ResourceRecord::new("ns1.example.com.", 60, RData::A(Ipv4Addr::new(192, 0, 2, 1)))
            .in_section(Section::Additional);
    let answer = ResourceRecord::new("example.com.", 60, RData::A(Ipv4Addr::new(192, 0, 2, 2)));
    let msg = response_with(vec![additional.clone(), answer.clone()]);

    let decoded = decode(&encode(&msg).unwrap()).unwrap();
    assert_eq!(decoded.records, vec![answer, additional]);
}

#[test]
fn test_flags_opcode_and_rcode_survive() {
    let mut msg = response_with(vec![]);
    msg.flags.truncated = true;
    msg.opcode = Opcode::Status;
    msg.response_code = ResponseCode::Refused;
    let decoded = decode(&encode(&msg).unwrap()).unwrap();
    assert_eq!(decoded.flags, msg.flags);
    assert_eq!(decoded.opcode, Opcode::Status);
    assert_eq!(decoded.response_code, ResponseCode::Refused);
}

#[test]
fn test_names_decode_fully_qualified() {
    let msg = Message::query(1, Question::new("Example.COM", RecordType::A), false);
    let decoded = decode(&encode(&msg).unwrap()).unwrap();
    assert_eq!(decoded.questions[0].domain, "Example.COM.");
}

#[test]
fn test_ipv6_is_rendered_without_compression() {
    let record = ResourceRecord::new("example.com.", 60, RData::Aaaa(Ipv6Addr::LOCALHOST));
    let decoded = decode(&encode(&response_with(vec![record])).unwrap()).unwrap();
    assert_eq!(
        decoded.records[0].rdata.to_string(),
        "0000:0000:0000:0000:0000:0000:0000:0001"
    );
}

/// Header with one question and one answer, followed by `example.com. A IN`.
fn header_and_question() -> Vec<u8> {
    let mut bytes = vec![0x12, 0x34, 0x84, 0x00, 0, 1, 0, 1, 0, 0, 0, 0];
    bytes.extend_from_slice(&[7]);
    bytes.extend_from_slice(b"example");
    bytes.extend_from_slice(&[3]);
    bytes.extend_from_slice(b"com");
    bytes.extend_from_slice(&[0, 0, 1, 0, 1]);
    bytes
}

fn answer_tail(rdata: &[u8], record_type: u16) -> Vec<u8> {
    let mut tail = Vec::new();
    tail.extend_from_slice(&record_type.to_be_bytes());
    tail.extend_from_slice(&[0, 1, 0, 0, 0, 60]);
    tail.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    tail.extend_from_slice(rdata);
    tail
}

#[test]
fn test_compressed_name_matches_uncompressed() {
    let mut compressed = header_and_question();
    compressed.extend_from_slice(&[0xC0, 0x0C]);
    compressed.extend(answer_tail(&[192, 0, 2, 1], 1));

    let mut plain = header_and_question();
    plain.extend_from_slice(&[7]);
    plain.extend_from_slice(b"example");
    plain.extend_from_slice(&[3]);
    plain.extend_from_slice(b"com");
    plain.push(0);
    plain.extend(answer_tail(&[192, 0, 2, 1], 1));

    let a = decode(&compressed).unwrap();
    let b = decode(&plain).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.records[0].domain, "example.com.");
}

#[test]
fn test_compressed_suffix_in_rdata() {
    // www.<ptr to example.com.> inside a CNAME payload
    let mut bytes = header_and_question();
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    bytes.extend(answer_tail(&[3, b'w', b'w', b'w', 0xC0, 0x0C], 5));

    let msg = decode(&bytes).unwrap();
    assert_eq!(msg.records[0].rdata, RData::Cname("www.example.com.".into()));
}

#[test]
fn test_truncated_buffers_fail_cleanly() {
    let msg = response_with(every_record_type());
    let bytes = encode(&msg).unwrap();
    for cut in 0..bytes.len() {
        match decode(&bytes[..cut]) {
            Err(DomainError::MalformedMessage(_)) => {}
            other => panic!("cut at {} decoded to {:?}", cut, other),
        }
    }
}

#[test]
fn test_rdata_longer_than_parsed_is_skipped() {
    let mut bytes = header_and_question();
    bytes[7] = 2;
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    // A record whose rdlength claims six bytes
    bytes.extend(answer_tail(&[192, 0, 2, 1, 0xFF, 0xFF], 1));
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    bytes.extend(answer_tail(&[192, 0, 2, 2], 1));

    let msg = decode(&bytes).unwrap();
    assert_eq!(msg.records.len(), 2);
    assert_eq!(msg.records[1].rdata, RData::A(Ipv4Addr::new(192, 0, 2, 2)));
}

#[test]
fn test_rdata_shorter_than_parsed_is_malformed() {
    let mut bytes = header_and_question();
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    // MX claims three bytes, but its name runs further
    let mut tail = answer_tail(&[0, 10, 4, b'm', b'a', b'i', b'l', 0], 15);
    tail[8] = 0;
    tail[9] = 3;
    bytes.extend(tail);

    assert!(matches!(decode(&bytes), Err(DomainError::MalformedMessage(_))));
}

#[test]
fn test_empty_txt_is_malformed() {
    let mut bytes = header_and_question();
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    bytes.extend(answer_tail(&[], 16));
    assert!(matches!(decode(&bytes), Err(DomainError::MalformedMessage(_))));

    let record = ResourceRecord::new("example.com.", 60, RData::Txt(vec![]));
    assert!(encode(&response_with(vec![record])).is_err());
}

#[test]
fn test_txt_empty_string_is_kept() {
    let record = ResourceRecord::new("example.com.", 60, RData::Txt(vec![String::new()]));
    let decoded = decode(&encode(&response_with(vec![record.clone()])).unwrap()).unwrap();
    assert_eq!(decoded.records, vec![record]);
}

#[test]
fn test_oversized_character_string_is_rejected() {
    let record = ResourceRecord::new("example.com.", 60, RData::Txt(vec!["x".repeat(256)]));
    assert!(matches!(
        encode(&response_with(vec![record])),
        Err(DomainError::MalformedMessage(_))
    ));
}

#[test]
fn test_overlong_label_is_rejected() {
    let name = format!("{}.example.com.", "a".repeat(64));
    let msg = Message::query(1, Question::new(name, RecordType::A), false);
    assert!(matches!(encode(&msg), Err(DomainError::MalformedMessage(_))));
}

#[test]
fn test_forward_pointer_is_rejected() {
    let mut bytes = header_and_question();
    let end = bytes.len() as u16 + 2;
    bytes.extend_from_slice(&(0xC000 | end).to_be_bytes());
    bytes.extend(answer_tail(&[192, 0, 2, 1], 1));
    assert!(matches!(decode(&bytes), Err(DomainError::MalformedMessage(_))));
}

#[test]
fn test_unknown_type_keeps_raw_payload() {
    let mut bytes = header_and_question();
    bytes.extend_from_slice(&[0xC0, 0x0C]);
    bytes.extend(answer_tail(&[9, 8, 7], 99));
    let msg = decode(&bytes).unwrap();
    assert_eq!(msg.records[0].record_type, RecordType::Unknown(99));
    assert_eq!(msg.records[0].rdata, RData::Opaque(vec![9, 8, 7]));
}
