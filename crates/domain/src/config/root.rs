use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::responder::ResponderConfig;
use super::transport::TransportConfig;

const LOCAL_CONFIG: &str = "dnstrace.toml";
const SYSTEM_CONFIG: &str = "/etc/dnstrace/config.toml";

/// Main configuration structure for dnstrace
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Client-side transport (shared UDP socket, TCP fallback)
    #[serde(default)]
    pub transport: TransportConfig,

    /// Iterative resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Fixed-answer authoritative responder
    #[serde(default)]
    pub responder: ResponderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dnstrace.toml in current directory
    /// 3. /etc/dnstrace/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if std::path::Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.responder_port {
            self.responder.port = port;
        }
        if let Some(bind) = overrides.responder_bind {
            self.responder.bind_address = bind;
        }
        if let Some(timeout) = overrides.query_timeout_ms {
            self.transport.query_timeout_ms = timeout;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.max_iterations == 0 {
            return Err(ConfigError::Validation(
                "resolver.max_iterations must be at least 1".to_string(),
            ));
        }

        if self.transport.query_timeout_ms == 0 || self.transport.tcp_idle_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "transport timeouts must be greater than zero".to_string(),
            ));
        }

        if self.responder.tracked_names == 0 {
            return Err(ConfigError::Validation(
                "responder.tracked_names must be at least 1".to_string(),
            ));
        }

        self.resolver
            .root_nameservers()
            .map_err(|e| ConfigError::Validation(format!("resolver.root_hints: {}", e)))?;

        self.responder
            .answer_address
            .parse::<Ipv4Addr>()
            .map_err(|e| {
                ConfigError::Validation(format!(
                    "responder.answer_address '{}': {}",
                    self.responder.answer_address, e
                ))
            })?;

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub responder_port: Option<u16>,
    pub responder_bind: Option<String>,
    pub query_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}
