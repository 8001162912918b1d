//! Operator tooling for SCI deployments.
//!
//! - [`Multisig`] collects calls into proposals that execute atomically once
//!   enough owners approve.
//! - [`PublicList`] and [`RegistrationTargets`] register domains and their
//!   verifier entries in bulk, either one transaction at a time or as a
//!   single multisig proposal.

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

mod multisig;
pub use multisig::{BatchBuilder, BatchError, Multisig, Proposal};

mod registration;
pub use registration::{
    ListedChain, PublicList, RegistrationError, RegistrationReport, RegistrationTargets,
};
