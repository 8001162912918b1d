//! Bindings for the SCI smart contracts.
//!
//! Contains the ABI of the registry, the registrars, the cross-domain
//! messenger, the verifier, the SCI facade and the proxy contracts, along with
//! the ENS namehash used to derive domain hashes.

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
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod bindings;
pub use bindings::{
    hash_cross_domain_message, CrossDomainMessenger, Ens, EnsRegistrar, IAccessControl, IOwnable,
    IPausable, ProxyAdmin, PublicListVerifier, Sci, SciRegistrar, SciRegistry,
    SuperChainTargetRegistrar, TransparentUpgradeableProxy,
};

mod namehash;
pub use namehash::{labelhash, namehash, subnode};
