use super::{
    EnsRegistrarModule, PublicListVerifierModule, SciModule, SciRegistrarModule,
    SciRegistryModule, SuperChainTargetRegistrarModule,
};
use crate::{DeployError, DeploymentTarget, Module, ModuleBuilder};
use alloy::primitives::Address;
use sci_constants::Role;

/// Everything deployed on a chain hosting the registry: registry, local
/// registrar, verifier and SCI. The ENS registrar is left to
/// [`SatelliteModule`], since its messenger and target registrar parameters
/// only exist on the chain that forwards registrations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolModule;

/// Outputs of [`ProtocolModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolOutput {
    /// The registry.
    pub sci_registry: Address,
    /// The local registrar.
    pub sci_registrar: Address,
    /// The public list verifier.
    pub public_list_verifier: Address,
    /// SCI, at the proxy address.
    pub sci: Address,
    /// Admin allowed to upgrade SCI.
    pub proxy_admin: Address,
}

impl Module for ProtocolModule {
    const ID: &'static str = "ProtocolModule";
    type Output = ProtocolOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let sci_registry = m.use_module::<SciRegistryModule>()?.sci_registry;
        let sci_registrar = m.use_module::<SciRegistrarModule>()?.sci_registrar;
        let public_list_verifier = m.use_module::<PublicListVerifierModule>()?.public_list_verifier;
        let sci = m.use_module::<SciModule>()?;
        Ok(ProtocolOutput {
            sci_registry,
            sci_registrar,
            public_list_verifier,
            sci: sci.sci,
            proxy_admin: sci.proxy_admin,
        })
    }
}

/// Everything deployed on a chain that only forwards registrations: the ENS
/// registrar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SatelliteModule;

/// Outputs of [`SatelliteModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteOutput {
    /// The ENS registrar.
    pub ens_registrar: Address,
}

impl Module for SatelliteModule {
    // Published manifests carry this spelling.
    const ID: &'static str = "SateliteModule";
    type Output = SatelliteOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let ens_registrar = m.use_module::<EnsRegistrarModule>()?.ens_registrar;
        Ok(SatelliteOutput { ens_registrar })
    }
}

/// Final wiring once the origin chain is deployed: lets the ENS registrar on
/// the other chain register through the target registrar.
///
/// Parameters: `ensRegistrarAddress`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupModule;

/// Outputs of [`CleanupModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOutput {
    /// The target registrar.
    pub super_chain_target_registrar: Address,
}

impl Module for CleanupModule {
    const ID: &'static str = "CleanupModule";
    type Output = CleanupOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let target = m.use_module::<SuperChainTargetRegistrarModule>()?.super_chain_target_registrar;
        let ens_registrar = m.address_parameter("ensRegistrarAddress")?;
        m.grant_role_at("SuperChainTargetRegistrar", target, Role::RegisterDomain, ens_registrar)?;
        Ok(CleanupOutput { super_chain_target_registrar: target })
    }
}
