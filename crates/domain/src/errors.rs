use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Query to {server} timed out")]
    Timeout { server: String },

    #[error("Connection to {server} closed before the full reply arrived")]
    ConnectionClosed { server: String },

    #[error("Reply from {server} was truncated over both UDP and TCP")]
    PersistentTruncation { server: String },

    #[error("Reply from {server} was truncated and the TCP retry failed: {reason}")]
    TruncatedUnconfirmable { server: String, reason: String },

    #[error("Multiple CNAMEs for the same domain \"{name}\"")]
    MultipleCnames { name: String },

    #[error("CNAME chain detected ({})", .chain.join(" -> "))]
    CnameLoop { chain: Vec<String> },

    #[error("Max queries limit ({0}) was reached without receiving an authoritative response")]
    MaxIterationsExceeded(u32),

    #[error("Didn't receive an authoritative response or referral for \"{name}\" from any of the nameservers that were contacted")]
    NoAuthorityReached { name: String },

    #[error("Transaction ID space exhausted: 65536 queries are outstanding")]
    IdSpaceExhausted,

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to look up nameserver {host}: {reason}")]
    NameserverLookup { host: String, reason: String },

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),
}

impl DomainError {
    /// Protocol violations and budget exhaustion end a resolution; everything
    /// else only disqualifies the server that produced it.
    pub fn is_fatal_to_resolution(&self) -> bool {
        matches!(
            self,
            DomainError::MultipleCnames { .. }
                | DomainError::CnameLoop { .. }
                | DomainError::MaxIterationsExceeded(_)
                | DomainError::NoAuthorityReached { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DomainError::Timeout { .. })
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Io(e.to_string())
    }
}
