mod chains;
pub use chains::{KnownChains, ParseChainError};

mod deployment;
pub use deployment::SciDeployment;

mod gas;
pub use gas::{RelayGasLimits, REGISTER_DOMAIN_GAS_LIMIT, REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT};

mod keys;
pub use keys::{DeploymentKey, ParseKeyError};

mod roles;
pub use roles::{ParseRoleError, Role, DEFAULT_ADMIN_ROLE};
