use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponderConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Address placed in every A answer.
    #[serde(default = "default_answer_address")]
    pub answer_address: String,

    #[serde(default)]
    pub answer_ttl: u32,

    /// Distinct names whose askers are remembered.
    #[serde(default = "default_tracked_names")]
    pub tracked_names: usize,

    #[serde(default = "default_sightings_ttl_secs")]
    pub sightings_ttl_secs: u64,
}

impl ResponderConfig {
    pub fn sightings_ttl(&self) -> Duration {
        Duration::from_secs(self.sightings_ttl_secs)
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            answer_address: default_answer_address(),
            answer_ttl: 0,
            tracked_names: default_tracked_names(),
            sightings_ttl_secs: default_sightings_ttl_secs(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    53
}

fn default_answer_address() -> String {
    "142.93.26.121".to_string()
}

fn default_tracked_names() -> usize {
    1024
}

fn default_sightings_ttl_secs() -> u64 {
    60
}
