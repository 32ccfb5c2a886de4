use serde::Serialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// A server the resolver may query: its hostname and, when known, an address.
///
/// Root hints always carry an address. Referral targets carry one when the
/// referral supplied A glue; otherwise the transport resolves the hostname.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Nameserver {
    pub name: String,
    pub address: Option<IpAddr>,
}

impl Nameserver {
    pub fn new(name: impl Into<String>, address: Option<IpAddr>) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }

    /// String handed to the transport: the address when known, else the hostname.
    pub fn target(&self) -> String {
        match self.address {
            Some(addr) => addr.to_string(),
            None => self.name.trim_end_matches('.').to_string(),
        }
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(addr) => write!(f, "{} ({})", self.name, addr),
            None => write!(f, "{}", self.name),
        }
    }
}

impl FromStr for Nameserver {
    type Err = String;

    /// `name`, `ip` or `name=ip`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty nameserver".to_string());
        }

        if let Some((name, addr)) = s.split_once('=') {
            let addr = addr
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| format!("invalid address for {}: {}", name, e))?;
            return Ok(Nameserver::new(name.trim(), Some(addr)));
        }

        match s.parse::<IpAddr>() {
            Ok(addr) => Ok(Nameserver::new(s, Some(addr))),
            Err(_) => Ok(Nameserver::new(s, None)),
        }
    }
}

const ROOT_SERVERS: [(&str, Ipv4Addr); 13] = [
    ("a.root-servers.net", Ipv4Addr::new(198, 41, 0, 4)),
    ("b.root-servers.net", Ipv4Addr::new(170, 247, 170, 2)),
    ("c.root-servers.net", Ipv4Addr::new(192, 33, 4, 12)),
    ("d.root-servers.net", Ipv4Addr::new(199, 7, 91, 13)),
    ("e.root-servers.net", Ipv4Addr::new(192, 203, 230, 10)),
    ("f.root-servers.net", Ipv4Addr::new(192, 5, 5, 241)),
    ("g.root-servers.net", Ipv4Addr::new(192, 112, 36, 4)),
    ("h.root-servers.net", Ipv4Addr::new(198, 97, 190, 53)),
    ("i.root-servers.net", Ipv4Addr::new(192, 36, 148, 17)),
    ("j.root-servers.net", Ipv4Addr::new(192, 58, 128, 30)),
    ("k.root-servers.net", Ipv4Addr::new(193, 0, 14, 129)),
    ("l.root-servers.net", Ipv4Addr::new(199, 7, 83, 42)),
    ("m.root-servers.net", Ipv4Addr::new(202, 12, 27, 33)),
];

/// The 13 well-known root servers.
pub fn root_servers() -> Vec<Nameserver> {
    ROOT_SERVERS
        .iter()
        .map(|(name, addr)| Nameserver::new(*name, Some(IpAddr::V4(*addr))))
        .collect()
}
