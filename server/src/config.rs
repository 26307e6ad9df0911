//! Service configuration loaded from YAML.
//!
//! Every field has a default, so an empty document (or no file at all) yields a working config.

use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use serde::Deserialize;

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
/// Top-level service configuration.
pub struct ServiceConfig {
    #[serde(default = "default_listen_addr")]
    /// Address the service listens on.
    pub listen_addr: SocketAddr,

    #[serde(default = "default_max_body_bytes")]
    /// Maximum accepted request body size. Larger bodies are rejected with 413.
    pub max_body_bytes: usize,

    #[serde(default)]
    /// Fire one sample request at `/process-single` once the listener is bound.
    pub self_test: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            max_body_bytes: default_max_body_bytes(),
            self_test: false,
        }
    }
}

impl ServiceConfig {
    /// Parse a YAML service config from bytes.
    pub fn from_yaml_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        // serde_yaml treats an empty document as unit, not as an empty mapping.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_slice(bytes)?)
    }

    /// Read and parse a YAML config file.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_yaml_bytes(&bytes).with_context(|| format!("parse config {}", path.display()))
    }
}
