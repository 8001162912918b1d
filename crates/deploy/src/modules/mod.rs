//! The SCI deployment modules.
//!
//! Dependency order: [`SciRegistryModule`] first, then the registrars and
//! [`PublicListVerifierModule`], then the proxy ([`ProxyModule`],
//! [`SciModule`]), and finally the role grants of [`CleanupModule`] once
//! both sides of the cross-domain relay exist.

mod registry;
pub use registry::{SciRegistryModule, SciRegistryOutput};

mod registrars;
pub use registrars::{
    EnsRegistrarModule, EnsRegistrarOutput, SciRegistrarModule, SciRegistrarOutput,
    SuperChainTargetRegistrarModule, SuperChainTargetRegistrarOutput,
};

mod verifier;
pub use verifier::{PublicListVerifierModule, PublicListVerifierOutput};

mod sci;
pub use sci::{ProxyModule, ProxyOutput, SciModule, SciOutput, SciUpgradeModule, UpgradeModule};

mod composite;
pub use composite::{
    CleanupModule, CleanupOutput, ProtocolModule, ProtocolOutput, SatelliteModule,
    SatelliteOutput,
};

/// Default admin transfer delay passed to access-controlled contracts.
pub(crate) const DEFAULT_ADMIN_DELAY: u64 = 0;
