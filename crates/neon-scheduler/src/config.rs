//! Scheduler configuration.
//!
//! Loaded from a TOML file; every key is optional and falls back to a local
//! development setup:
//!
//! ```toml
//! evm_rpc_url = "https://devnet.neonevm.org"
//! ledger_rpc_url = "https://api.devnet.solana.com"
//! request_timeout_ms = 10000
//! skip_preflight = false
//! treasury_airdrop_lamports = 1000000000
//!
//! [gas]
//! gas_limit = 9999999
//! max_fee_per_gas = 50000000000
//! max_priority_fee_per_gas = 10000000000
//! ```

use std::path::Path;
use std::time::Duration;

use neon_evm::GasSettings;
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Lamports a dev environment airdrops to the treasury pool before submitting.
pub const DEV_TREASURY_AIRDROP_LAMPORTS: u64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Neon EVM JSON-RPC endpoint (`neon_getEvmParams`, `eth_*`).
    pub evm_rpc_url: String,
    /// Solana JSON-RPC endpoint.
    pub ledger_rpc_url: String,
    /// Per-request HTTP timeout.
    pub request_timeout_ms: u64,
    pub skip_preflight: bool,
    /// When set, the selected treasury pool is funded before submission.
    /// Only meaningful on networks that serve `requestAirdrop`.
    pub treasury_airdrop_lamports: Option<u64>,
    pub gas: GasSettings,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            evm_rpc_url: "http://127.0.0.1:9090/solana".into(),
            ledger_rpc_url: "http://127.0.0.1:8899".into(),
            request_timeout_ms: 10_000,
            skip_preflight: false,
            treasury_airdrop_lamports: None,
            gas: GasSettings::default(),
        }
    }
}

impl SchedulerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, SchedulerError> {
        let config: Self =
            toml::from_str(text).map_err(|e| SchedulerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, SchedulerError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SchedulerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Per-request timeout for both JSON-RPC clients.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Rejects settings no request could succeed with.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.evm_rpc_url.trim().is_empty() {
            return Err(SchedulerError::Config("evm_rpc_url is empty".into()));
        }
        if self.ledger_rpc_url.trim().is_empty() {
            return Err(SchedulerError::Config("ledger_rpc_url is empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(SchedulerError::Config(
                "request_timeout_ms must be > 0".into(),
            ));
        }
        if self.gas.gas_limit == 0 {
            return Err(SchedulerError::Config("gas.gas_limit must be > 0".into()));
        }
        Ok(())
    }
}
