//! SCI constants and configuration.
//!
//! This crate contains the role identifiers, relay gas limits, known chains
//! and published contract addresses of the SCI protocol, along with helpers
//! for loading tooling configuration from the environment.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod chains;
pub use chains::{localhost, optimism, sepolia};

pub mod config;
pub use config::{ConfigError, NetworkConfig, SignerConfig, ToolkitConfig};

mod types;
pub use types::{
    DeploymentKey, KnownChains, ParseChainError, ParseKeyError, ParseRoleError, RelayGasLimits,
    Role, SciDeployment, DEFAULT_ADMIN_ROLE, REGISTER_DOMAIN_GAS_LIMIT,
    REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT,
};
