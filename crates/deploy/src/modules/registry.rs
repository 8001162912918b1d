use super::DEFAULT_ADMIN_DELAY;
use crate::{DeployError, DeploymentTarget, Module, ModuleBuilder};
use alloy::primitives::Address;
use sci_constants::Role;
use sci_protocol::ContractSpec;

/// Deploys the `SciRegistry` and makes account 0 its registrar manager.
#[derive(Debug, Clone, Copy, Default)]
pub struct SciRegistryModule;

/// Outputs of [`SciRegistryModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SciRegistryOutput {
    /// The registry.
    pub sci_registry: Address,
}

impl Module for SciRegistryModule {
    const ID: &'static str = "SciRegistry";
    type Output = SciRegistryOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let registry = m.contract(
            "SciRegistry",
            ContractSpec::Registry { default_admin_delay: DEFAULT_ADMIN_DELAY },
        )?;
        let manager = m.account(0)?;
        m.grant_role(&registry, Role::RegistrarManager, manager)?;
        Ok(SciRegistryOutput { sci_registry: registry.address })
    }
}
