use crate::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::net::Ipv4Addr;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means no CORS layer is installed.
    pub cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - CORS_ALLOWED_ORIGIN: optional comma-separated list
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or("PORT", 8080u16)?;
        let cors_allowed_origins = env_or_default("CORS_ALLOWED_ORIGIN", "")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}
