use crate::{
    config::env_utils::{load_chain_ids_opt, load_string_opt, load_u32_opt},
    localhost, ConfigError, RelayGasLimits,
};
use std::path::PathBuf;

/// Default directory holding `chain-<id>` deployment folders.
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "ignition/deployments";

/// Chains left out of aggregated manifests by default.
pub const DEFAULT_EXCLUDED_CHAINS: [u64; 1] = [localhost::CHAIN_ID];

/// Environment-driven settings shared by the deployment tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitConfig {
    /// Directory containing `chain-<id>/deployed_addresses.json`.
    pub deployments_dir: PathBuf,
    /// Chain ids never included in aggregated manifests.
    pub excluded_chains: Vec<u64>,
    /// Gas limits for relayed registrations.
    pub gas_limits: RelayGasLimits,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            deployments_dir: PathBuf::from(DEFAULT_DEPLOYMENTS_DIR),
            excluded_chains: DEFAULT_EXCLUDED_CHAINS.to_vec(),
            gas_limits: RelayGasLimits::default(),
        }
    }
}

impl ToolkitConfig {
    /// Load the config from the environment, falling back to defaults.
    ///
    /// Reads `SCI_DEPLOYMENTS_DIR`, `SCI_EXCLUDED_CHAINS`,
    /// `SCI_REGISTER_DOMAIN_GAS_LIMIT` and
    /// `SCI_REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(dir) = load_string_opt("SCI_DEPLOYMENTS_DIR") {
            config.deployments_dir = dir.into();
        }
        if let Some(excluded) = load_chain_ids_opt("SCI_EXCLUDED_CHAINS")? {
            config.excluded_chains = excluded;
        }
        if let Some(limit) = load_u32_opt("SCI_REGISTER_DOMAIN_GAS_LIMIT") {
            config.gas_limits = config.gas_limits.with_register_domain(limit);
        }
        if let Some(limit) = load_u32_opt("SCI_REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT") {
            config.gas_limits = config.gas_limits.with_register_domain_with_verifier(limit);
        }
        tracing::debug!(?config, "loaded toolkit config");
        Ok(config)
    }

    /// True if the chain is excluded from aggregated manifests.
    pub fn is_excluded(&self, chain_id: u64) -> bool {
        self.excluded_chains.contains(&chain_id)
    }
}
