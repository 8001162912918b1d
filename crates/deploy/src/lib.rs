//! Deployment of the SCI contracts.
//!
//! Deployments are described by [`Module`]s, mirroring Hardhat Ignition:
//! each module declares contract futures (`<Module>#<Contract>`) and call
//! futures, and may use other modules, which run once per [`Deployer`]. The
//! [`DeploymentState`] records deployed addresses and executed calls per
//! chain, so re-running a module against an existing state only applies
//! what is missing.
//!
//! The [`manifest`] module reads and aggregates the resulting
//! `deployed_addresses.json` files.

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

mod builder;
pub use builder::{ContractFuture, DeploymentReport, Deployer, Module, ModuleBuilder};

mod error;
pub use error::DeployError;

pub mod manifest;
pub use manifest::{AggregatedManifest, DeploymentManifest, ManifestError};

pub mod modules;

mod parameters;
pub use parameters::Parameters;

mod state;
pub use state::{DeploymentState, Journal, JOURNAL_FILE};

mod target;
pub use target::DeploymentTarget;
