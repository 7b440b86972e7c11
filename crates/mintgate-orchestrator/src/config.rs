//! Orchestrator timeouts and limits

use std::time::Duration;

use serde::Deserialize;

/// Timeouts for the three suspension points of a mint attempt
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Bound on each contract state read
    pub read_timeout_ms: u64,
    /// Bound on dispatching the mint transaction
    pub submit_timeout_ms: u64,
    /// Bound on waiting for inclusion
    pub confirmation_timeout_ms: u64,
    /// Per-wallet limit to enforce before the first state read, if known
    pub initial_max_mint: Option<u32>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 15_000,
            submit_timeout_ms: 120_000,
            confirmation_timeout_ms: 300_000,
            initial_max_mint: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }
}
