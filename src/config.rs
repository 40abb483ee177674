//! Host configuration parsed from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "::";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("config parse failed: {0}")]
    Config(String),

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: std::io::Error },

    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// IP literal to bind.
    pub host: String,
    pub port: u16,
    /// Directory holding the built site.
    pub dist_dir: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT, dist_dir: PathBuf::from(DEFAULT_DIST_DIR) }
    }
}

impl HostConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `HOST`: default `::`
    /// - `PORT`: default 8080
    /// - `DIST_DIR`: default `dist`
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Config`] if `PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, HostError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|e| HostError::Config(format!("invalid PORT '{raw}': {e}")))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned()),
            port,
            dist_dir: std::env::var("DIST_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DIST_DIR), PathBuf::from),
        })
    }

    /// # Errors
    ///
    /// Returns [`HostError::Config`] if `host` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, HostError> {
        let ip: IpAddr =
            self.host.parse().map_err(|e| HostError::Config(format!("invalid HOST '{}': {e}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
