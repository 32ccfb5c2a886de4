use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoaData {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

/// Type-specific payload of a resource record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RData {
    A(Ipv4Addr),
    #[serde(serialize_with = "serialize_expanded_ipv6")]
    Aaaa(Ipv6Addr),
    Cname(String),
    Ns(String),
    Ptr(String),
    Mx { preference: u16, exchange: String },
    Soa(SoaData),
    Srv(SrvData),
    Txt(Vec<String>),
    Caa { flags: u8, issuer: String },
    /// Payload of a record type the codec has no parser for.
    Opaque(Vec<u8>),
}

impl RData {
    /// Domain name carried by CNAME, NS and PTR records.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            RData::Cname(name) | RData::Ns(name) | RData::Ptr(name) => Some(name),
            _ => None,
        }
    }
}

/// Eight zero-padded hex groups. Runs of zero groups are never collapsed.
pub fn expanded_ipv6(addr: &Ipv6Addr) -> String {
    addr.segments()
        .iter()
        .map(|group| format!("{:04x}", group))
        .collect::<Vec<_>>()
        .join(":")
}

fn serialize_expanded_ipv6<S: serde::Serializer>(
    addr: &Ipv6Addr,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&expanded_ipv6(addr))
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::Aaaa(addr) => write!(f, "{}", expanded_ipv6(addr)),
            RData::Cname(name) | RData::Ns(name) | RData::Ptr(name) => write!(f, "{}", name),
            RData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RData::Soa(soa) => write!(
                f,
                "{} {} {} {} {} {} {}",
                soa.mname, soa.rname, soa.serial, soa.refresh, soa.retry, soa.expire, soa.minimum
            ),
            RData::Srv(srv) => write!(
                f,
                "{} {} {} {}",
                srv.priority, srv.weight, srv.port, srv.target
            ),
            RData::Txt(strings) => {
                let quoted: Vec<String> = strings.iter().map(|s| format!("{:?}", s)).collect();
                write!(f, "{}", quoted.join(" "))
            }
            RData::Caa { flags, issuer } => write!(f, "{} {}", flags, issuer),
            RData::Opaque(bytes) => write!(f, "\\# {}", bytes.len()),
        }
    }
}
