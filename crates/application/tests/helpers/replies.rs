use dnstrace_domain::{Message, Question, RecordType, ResourceRecord, ResponseCode, Section};

fn reply_for(name: &str, record_type: RecordType) -> Message {
    let mut msg = Message::query(0, Question::new(name, record_type), false);
    msg.flags.response = true;
    msg
}

pub fn authoritative(name: &str, record_type: RecordType, records: Vec<ResourceRecord>) -> Message {
    let mut msg = reply_for(name, record_type);
    msg.flags.authoritative = true;
    msg.records = records;
    msg
}

pub fn name_error(name: &str, record_type: RecordType) -> Message {
    let mut msg = reply_for(name, record_type);
    msg.flags.authoritative = true;
    msg.response_code = ResponseCode::NameError;
    msg
}

pub fn server_failure(name: &str, record_type: RecordType) -> Message {
    let mut msg = reply_for(name, record_type);
    msg.response_code = ResponseCode::ServerError;
    msg
}

/// Non-authoritative reply carrying `ns` in the authority section and `glue`
/// in the additional section.
pub fn referral(
    name: &str,
    record_type: RecordType,
    ns: Vec<ResourceRecord>,
    glue: Vec<ResourceRecord>,
) -> Message {
    let mut msg = reply_for(name, record_type);
    msg.records.extend(ns.into_iter().map(|r| r.in_section(Section::Authority)));
    msg.records.extend(glue.into_iter().map(|r| r.in_section(Section::Additional)));
    msg
}
