use super::{SciRegistryModule, DEFAULT_ADMIN_DELAY};
use crate::{DeployError, DeploymentTarget, Module, ModuleBuilder};
use alloy::primitives::Address;
use sci_constants::Role;
use sci_protocol::ContractSpec;

/// Deploys the L1 `EnsRegistrar`, addressing messages to a target registrar
/// on another chain.
///
/// Parameters: `ensRegistryAddress`, `l1CrossDomainMessengerAddress` (or the
/// published `l1CrossDomainMessangerAddress`), `targetRegistrarAddress`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsRegistrarModule;

/// Outputs of [`EnsRegistrarModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsRegistrarOutput {
    /// The ENS registrar.
    pub ens_registrar: Address,
}

impl Module for EnsRegistrarModule {
    const ID: &'static str = "EnsRegistrar";
    type Output = EnsRegistrarOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let spec = ContractSpec::EnsRegistrar {
            ens: m.address_parameter("ensRegistryAddress")?,
            messenger: m.address_parameter_or(
                "l1CrossDomainMessengerAddress",
                "l1CrossDomainMessangerAddress",
            )?,
            target: m.address_parameter("targetRegistrarAddress")?,
            gas_limits: m.gas_limits(),
        };
        let ens_registrar = m.contract("EnsRegistrar", spec)?;
        Ok(EnsRegistrarOutput { ens_registrar: ens_registrar.address })
    }
}

/// Deploys the local `SciRegistrar`, makes it a registry registrar and lets
/// account 0 register domains through it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SciRegistrarModule;

/// Outputs of [`SciRegistrarModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SciRegistrarOutput {
    /// The registrar.
    pub sci_registrar: Address,
    /// The registry it forwards to.
    pub sci_registry: Address,
}

impl Module for SciRegistrarModule {
    // Published manifests carry this spelling.
    const ID: &'static str = "SciRegstrar";
    type Output = SciRegistrarOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let registry = m.use_module::<SciRegistryModule>()?.sci_registry;
        let registrar = m.contract(
            "SciRegistrar",
            ContractSpec::SciRegistrar { registry, default_admin_delay: DEFAULT_ADMIN_DELAY },
        )?;

        m.grant_role_at("SciRegistry", registry, Role::Registrar, registrar.address)?;
        let account = m.account(0)?;
        m.grant_role(&registrar, Role::RegisterDomain, account)?;

        Ok(SciRegistrarOutput { sci_registrar: registrar.address, sci_registry: registry })
    }
}

/// Deploys the L2 `SuperChainTargetRegistrar` and makes it a registry
/// registrar.
///
/// Parameters: `l2CrossDomainMessengerAddress` (or the published
/// `l2CrossDomainMessangerAddress`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SuperChainTargetRegistrarModule;

/// Outputs of [`SuperChainTargetRegistrarModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperChainTargetRegistrarOutput {
    /// The target registrar.
    pub super_chain_target_registrar: Address,
    /// The registry it forwards to.
    pub sci_registry: Address,
}

impl Module for SuperChainTargetRegistrarModule {
    const ID: &'static str = "SuperChainTargetRegistrar";
    type Output = SuperChainTargetRegistrarOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let registry = m.use_module::<SciRegistryModule>()?.sci_registry;
        let messenger = m.address_parameter_or(
            "l2CrossDomainMessengerAddress",
            "l2CrossDomainMessangerAddress",
        )?;
        let target = m.contract(
            "SuperChainTargetRegistrar",
            ContractSpec::TargetRegistrar {
                registry,
                messenger,
                default_admin_delay: DEFAULT_ADMIN_DELAY,
            },
        )?;
        m.grant_role_at("SciRegistry", registry, Role::Registrar, target.address)?;

        Ok(SuperChainTargetRegistrarOutput {
            super_chain_target_registrar: target.address,
            sci_registry: registry,
        })
    }
}
