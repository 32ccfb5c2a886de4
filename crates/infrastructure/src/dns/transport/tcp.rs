//! DNS over TCP (RFC 1035 §4.2.2)
//!
//! One connection per query. Messages carry a 2-byte big-endian length
//! prefix; the write half is shut down after the query so the server sees
//! the end of the request.

use crate::dns::codec;
use dnstrace_domain::{DomainError, Message};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const READ_CHUNK: usize = 4096;

pub async fn query_tcp(
    server: SocketAddr,
    message: &Message,
    idle_timeout: Duration,
) -> Result<Message, DomainError> {
    let bytes = codec::encode(message)?;
    let timeout = || DomainError::Timeout {
        server: server.to_string(),
    };

    let mut stream = tokio::time::timeout(idle_timeout, TcpStream::connect(server))
        .await
        .map_err(|_| timeout())??;
    stream.set_nodelay(true)?;

    tokio::time::timeout(idle_timeout, send_with_length_prefix(&mut stream, &bytes))
        .await
        .map_err(|_| timeout())??;

    debug!(server = %server, id = message.id, message_len = bytes.len(), "TCP query sent");

    let response = read_with_length_prefix(&mut stream, server, idle_timeout).await?;

    debug!(server = %server, response_len = response.len(), "TCP response received");

    codec::decode(&response)
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::MalformedMessage(format!(
            "{}-byte message does not fit a TCP length prefix",
            message_bytes.len()
        ))
    })?;

    stream.write_all(&length.to_be_bytes()).await?;
    stream.write_all(message_bytes).await?;
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}

/// Accumulates reads until the prefix-declared length is buffered and
/// returns exactly that region. Each read must make progress within
/// `idle_timeout`.
pub(crate) async fn read_with_length_prefix<S>(
    stream: &mut S,
    server: SocketAddr,
    idle_timeout: Duration,
) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut buf: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        if buf.len() >= 2 {
            let declared = u16::from_be_bytes([buf[0], buf[1]]) as usize;
            if buf.len() >= 2 + declared {
                buf.truncate(2 + declared);
                return Ok(buf.split_off(2));
            }
        }

        let n = tokio::time::timeout(idle_timeout, stream.read(&mut chunk))
            .await
            .map_err(|_| DomainError::Timeout {
                server: server.to_string(),
            })??;
        if n == 0 {
            return Err(DomainError::ConnectionClosed {
                server: server.to_string(),
            });
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}
