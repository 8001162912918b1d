//! Execution model of the SCI protocol contracts.
//!
//! A [`Chain`] hosts the registry, the registrars, the cross-domain
//! messengers and the SCI facade behind its proxy. Calls and events are the
//! ABI encodings of the [`sci_bindings`] interfaces, so the same calldata
//! an operator would sign can be executed and inspected here.
//!
//! Cross-domain registration spans two chains: the [`EnsRegistrar`] on the
//! origin dispatches a message to the origin [`Messenger`], and a [`Bridge`]
//! relays it to the destination messenger, which calls the
//! [`TargetRegistrar`].

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

mod access;
pub use access::{grant_role_call, revoke_role_call, AccessControl};

mod bridge;
pub use bridge::{Bridge, RelayOutcome, RelayStatus};

mod chain;
pub use chain::{
    BlockEnv, Call, CallContext, Chain, Contract, ContractSpec, Deployed, Receipt, BLOCK_TIME,
    GENESIS_TIMESTAMP,
};

mod ens;
pub use ens::{EnsRegistrar, EnsRegistry};

mod error;
pub use error::{ContractError, Result};

mod messenger;
pub use messenger::{CrossDomainMessage, Messenger};

mod proxy;
pub use proxy::{ProxyAdmin, TransparentProxy};

mod registrar;
pub use registrar::SciRegistrar;

mod registry;
pub use registry::Registry;

mod sci;
pub use sci::{verification_time, Sci, SciStorage};

mod target;
pub use target::TargetRegistrar;

mod verifier;
pub use verifier::{verified_at, PublicListVerifier, ANY_CHAIN};
