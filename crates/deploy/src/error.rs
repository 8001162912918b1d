use crate::ManifestError;
use alloy::primitives::Address;
use sci_constants::DeploymentKey;
use sci_protocol::ContractError;

/// Errors raised while running deployment modules.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A contract or call future reverted.
    #[error("future {future} reverted: {source}")]
    Reverted {
        /// The future id.
        future: String,
        /// The revert reason.
        #[source]
        source: ContractError,
    },
    /// A module parameter was not provided.
    #[error("missing parameter {module}.{name}")]
    MissingParameter {
        /// The module id.
        module: &'static str,
        /// The parameter name.
        name: &'static str,
    },
    /// A module parameter has the wrong shape.
    #[error("invalid parameter {module}.{name}: {reason}")]
    InvalidParameter {
        /// The module id.
        module: &'static str,
        /// The parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// No deployer account at the requested index.
    #[error("no account at index {0}")]
    MissingAccount(usize),
    /// The deployment state records an address with no contract behind it.
    #[error("{key} is recorded at {address} but no contract is deployed there")]
    StaleAddress {
        /// The recorded future.
        key: DeploymentKey,
        /// The recorded address.
        address: Address,
    },
    /// A constructor did not create the expected contract.
    #[error("{future} did not create a {name}")]
    MissingDerived {
        /// The deploying future.
        future: DeploymentKey,
        /// The expected contract.
        name: &'static str,
    },
    /// Loading or saving deployment files failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
