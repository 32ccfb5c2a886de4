use crate::nameserver::{root_servers, Nameserver};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Referral hops allowed for one resolution, CNAME restarts included.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Starting servers as `name` or `name=ip`. Empty means the 13 root servers.
    #[serde(default)]
    pub root_hints: Vec<String>,
}

impl ResolverConfig {
    pub fn root_nameservers(&self) -> Result<Vec<Nameserver>, String> {
        if self.root_hints.is_empty() {
            return Ok(root_servers());
        }
        self.root_hints.iter().map(|hint| hint.parse()).collect()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            root_hints: Vec::new(),
        }
    }
}

fn default_max_iterations() -> u32 {
    32
}
