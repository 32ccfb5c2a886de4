use super::dns_query::Question;
use super::dns_record::{RecordType, ResourceRecord, Section};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseCode {
    Ok,
    BadQuery,
    ServerError,
    NameError,
    Unsupported,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn to_u8(self) -> u8 {
        match self {
            ResponseCode::Ok => 0,
            ResponseCode::BadQuery => 1,
            ResponseCode::ServerError => 2,
            ResponseCode::NameError => 3,
            ResponseCode::Unsupported => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(code) => code & 0x0F,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0F {
            0 => ResponseCode::Ok,
            1 => ResponseCode::BadQuery,
            2 => ResponseCode::ServerError,
            3 => ResponseCode::NameError,
            4 => ResponseCode::Unsupported,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Ok => write!(f, "OK"),
            ResponseCode::BadQuery => write!(f, "Bad Query"),
            ResponseCode::ServerError => write!(f, "Server Error"),
            ResponseCode::NameError => write!(f, "Name Error"),
            ResponseCode::Unsupported => write!(f, "Not Supported"),
            ResponseCode::Refused => write!(f, "Refused"),
            ResponseCode::Other(code) => write!(f, "unknown ({})", code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Opcode {
    Standard,
    Inverse,
    Status,
    Other(u8),
}

impl Opcode {
    pub fn to_u8(self) -> u8 {
        match self {
            Opcode::Standard => 0,
            Opcode::Inverse => 1,
            Opcode::Status => 2,
            Opcode::Other(code) => code & 0x0F,
        }
    }

    pub fn from_u8(code: u8) -> Self {
        match code & 0x0F {
            0 => Opcode::Standard,
            1 => Opcode::Inverse,
            2 => Opcode::Status,
            other => Opcode::Other(other),
        }
    }
}

/// Single-bit header flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MessageFlags {
    pub response: bool,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursive_query: bool,
    pub recursion_available: bool,
}

/// One DNS protocol unit.
///
/// Answer, authority and additional records share one ordered list; each
/// record remembers its section so the header counts can be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: u16,
    pub flags: MessageFlags,
    pub opcode: Opcode,
    pub response_code: ResponseCode,
    pub questions: Vec<Question>,
    pub records: Vec<ResourceRecord>,
}

impl Message {
    /// Standard query carrying a single question.
    pub fn query(id: u16, question: Question, recursive: bool) -> Self {
        Self {
            id,
            flags: MessageFlags {
                recursive_query: recursive,
                ..MessageFlags::default()
            },
            opcode: Opcode::Standard,
            response_code: ResponseCode::Ok,
            questions: vec![question],
            records: Vec::new(),
        }
    }

    /// Empty response echoing `request`'s id, opcode and questions.
    pub fn response_to(request: &Message) -> Self {
        Self {
            id: request.id,
            flags: MessageFlags {
                response: true,
                ..MessageFlags::default()
            },
            opcode: request.opcode,
            response_code: ResponseCode::Ok,
            questions: request.questions.clone(),
            records: Vec::new(),
        }
    }

    pub fn section(&self, section: Section) -> impl Iterator<Item = &ResourceRecord> {
        self.records.iter().filter(move |r| r.section == section)
    }

    pub fn count(&self, section: Section) -> usize {
        self.section(section).count()
    }

    /// Records of `record_type` owned by `name`, class IN, any section.
    pub fn records_for<'a>(
        &'a self,
        name: &'a str,
        record_type: RecordType,
    ) -> impl Iterator<Item = &'a ResourceRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.answers(name, record_type))
    }

    pub fn is_name_error(&self) -> bool {
        self.response_code == ResponseCode::NameError
    }
}
