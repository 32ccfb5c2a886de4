use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Port used when a server string carries none.
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_tcp_idle_timeout_ms")]
    pub tcp_idle_timeout_ms: u64,

    /// Local address of the shared UDP socket.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl TransportConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn tcp_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.tcp_idle_timeout_ms)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            query_timeout_ms: default_query_timeout_ms(),
            tcp_idle_timeout_ms: default_tcp_idle_timeout_ms(),
            bind_address: default_bind_address(),
        }
    }
}

fn default_port() -> u16 {
    53
}

fn default_query_timeout_ms() -> u64 {
    3000
}

fn default_tcp_idle_timeout_ms() -> u64 {
    3000
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
