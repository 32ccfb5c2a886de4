use dnstrace_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use tokio::net::lookup_host;

/// A server string split into host and port, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerSpec {
    Addr(SocketAddr),
    Host { host: String, port: u16 },
}

/// Accepts `ip`, `ip:port`, `[v6]`, `[v6]:port`, `host` and `host:port`.
pub fn parse_server(server: &str, default_port: u16) -> Result<ServerSpec, DomainError> {
    let server = server.trim();
    if server.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "empty nameserver address".to_string(),
        ));
    }

    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(ServerSpec::Addr(addr));
    }
    let unbracketed = server.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = unbracketed.parse::<IpAddr>() {
        return Ok(ServerSpec::Addr(SocketAddr::new(ip, default_port)));
    }

    let (host, port) = match server.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => {
            let port = port.parse::<u16>().map_err(|_| {
                DomainError::InvalidDomainName(format!("invalid port in '{}'", server))
            })?;
            (host, port)
        }
        Some(_) => {
            return Err(DomainError::InvalidDomainName(format!(
                "unrecognised nameserver address '{}'",
                server
            )))
        }
        None => (server, default_port),
    };

    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return Err(DomainError::InvalidDomainName(format!(
            "missing host in '{}'",
            server
        )));
    }
    Ok(ServerSpec::Host {
        host: host.to_string(),
        port,
    })
}

/// Resolves a server string to one socket address, going through the
/// platform resolver for hostnames. Addresses of the family the local socket
/// can reach are preferred.
pub async fn resolve_server(
    server: &str,
    default_port: u16,
    want_ipv4: bool,
) -> Result<SocketAddr, DomainError> {
    match parse_server(server, default_port)? {
        ServerSpec::Addr(addr) => Ok(addr),
        ServerSpec::Host { host, port } => {
            let addrs: Vec<SocketAddr> = lookup_host((host.as_str(), port))
                .await
                .map_err(|e| DomainError::NameserverLookup {
                    host: host.clone(),
                    reason: e.to_string(),
                })?
                .collect();

            addrs
                .iter()
                .find(|addr| addr.is_ipv4() == want_ipv4)
                .or_else(|| addrs.first())
                .copied()
                .ok_or_else(|| DomainError::NameserverLookup {
                    host,
                    reason: "no addresses returned".to_string(),
                })
        }
    }
}
