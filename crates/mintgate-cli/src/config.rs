//! CLI configuration file
//!
//! ```toml
//! allowlist = "allowlist.txt"
//!
//! [gateway]
//! base_url = "https://relay.example"
//! contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
//! chain_id = 1
//!
//! [orchestrator]
//! confirmation_timeout_ms = 600000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use mintgate_client::GatewayConfig;
use mintgate_orchestrator::OrchestratorConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MintgateConfig {
    /// Allowlist file, one address per line
    pub allowlist: Option<PathBuf>,
    pub gateway: GatewayConfig,
    pub orchestrator: OrchestratorConfig,
}

impl MintgateConfig {
    /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
