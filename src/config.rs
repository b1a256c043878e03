//! Optional server configuration file.
//!
//! The server's CLI flags always win over the config file, which wins
//! over these built-in defaults -- see SPEC_FULL.md §6.

use serde::Deserialize;
use std::path::Path;

use crate::{DEFAULT_EXPORT_ROOT, DEFAULT_PORT};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub root: Option<String>,
    pub log_filter: Option<String>,
}

impl ServerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn bind_addr(&self) -> String {
        self.bind
            .clone()
            .unwrap_or_else(|| format!("127.0.0.1:{DEFAULT_PORT}"))
    }

    pub fn export_root(&self) -> String {
        self.root
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPORT_ROOT.to_string())
    }

    pub fn log_filter(&self) -> String {
        self.log_filter.clone().unwrap_or_else(|| "info".to_string())
    }
}
