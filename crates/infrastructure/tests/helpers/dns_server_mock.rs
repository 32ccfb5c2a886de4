use dnstrace_domain::Message;
use dnstrace_infrastructure::dns::codec;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// Maps a decoded request to the reply to send. `None` means stay silent
/// (UDP) or hang up (TCP).
pub type Script = Arc<dyn Fn(&Message) -> Option<Message> + Send + Sync>;

/// UDP and TCP listeners sharing one loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_connections: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(udp: Script, tcp: Script) -> Result<Self, std::io::Error> {
        let (listener, socket) = bind_pair().await?;
        let addr = socket.local_addr()?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_connections = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_connections);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(reply) = codec::decode(&buf[..len]).ok().and_then(|m| udp(&m)) {
                                let bytes = codec::encode(&reply).unwrap();
                                let _ = socket.send_to(&bytes, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((stream, _)) = accepted {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(serve_tcp(stream, Arc::clone(&tcp)));
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_connections,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_connections(&self) -> usize {
        self.tcp_connections.load(Ordering::SeqCst)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn bind_pair() -> Result<(TcpListener, UdpSocket), std::io::Error> {
    let mut last_err = None;
    for _ in 0..16 {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        match UdpSocket::bind(("127.0.0.1", port)).await {
            Ok(socket) => return Ok((listener, socket)),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap())
}

async fn serve_tcp(mut stream: tokio::net::TcpStream, script: Script) {
    let mut len_buf = [0u8; 2];
    if stream.read_exact(&mut len_buf).await.is_err() {
        return;
    }
    let mut body = vec![0u8; u16::from_be_bytes(len_buf) as usize];
    if stream.read_exact(&mut body).await.is_err() {
        return;
    }
    let Some(reply) = codec::decode(&body).ok().and_then(|m| script(&m)) else {
        return;
    };
    let bytes = codec::encode(&reply).unwrap();
    let _ = stream.write_all(&(bytes.len() as u16).to_be_bytes()).await;
    // Split the body across writes so the client has to accumulate.
    let (head, tail) = bytes.split_at(bytes.len() / 2);
    let _ = stream.write_all(head).await;
    let _ = stream.flush().await;
    let _ = stream.write_all(tail).await;
    let _ = stream.shutdown().await;
}

/// Collects `batch` queries, sends a reply for an unknown transaction id,
/// then answers the batch in reverse arrival order.
pub struct ReversingUdpServer {
    addr: SocketAddr,
}

impl ReversingUdpServer {
    pub async fn start(batch: usize, answer: Script) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            let mut held: Vec<(Message, SocketAddr)> = Vec::new();

            while held.len() < batch {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                if let Ok(request) = codec::decode(&buf[..len]) {
                    held.push((request, peer));
                }
            }

            if let Some((request, peer)) = held.first() {
                if let Some(mut stray) = answer(request) {
                    stray.id = request.id.wrapping_add(1000);
                    let _ = socket.send_to(&codec::encode(&stray).unwrap(), peer).await;
                }
            }

            for (request, peer) in held.iter().rev() {
                if let Some(reply) = answer(request) {
                    let _ = socket.send_to(&codec::encode(&reply).unwrap(), peer).await;
                }
            }
        });

        Ok(Self { addr })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}
