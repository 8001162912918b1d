use super::SciRegistryModule;
use crate::{DeployError, DeploymentTarget, Module, ModuleBuilder};
use alloy::{primitives::Address, sol_types::SolCall};
use sci_bindings::{ProxyAdmin, Sci};
use sci_protocol::ContractSpec;

/// Deploys the `SCI` implementation behind a transparent proxy initialized
/// with account 0 as owner and the registry. The proxy creates its
/// `ProxyAdmin`, owned by account 0, whose address is recorded as
/// `ProxyModule#ProxyAdmin`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyModule;

/// Outputs of [`ProxyModule`] and [`UpgradeModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyOutput {
    /// The proxy.
    pub proxy: Address,
    /// Admin allowed to upgrade the proxy.
    pub proxy_admin: Address,
    /// The implementation deployed by the module.
    pub implementation: Address,
}

impl Module for ProxyModule {
    const ID: &'static str = "ProxyModule";
    type Output = ProxyOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let registry = m.use_module::<SciRegistryModule>()?.sci_registry;
        let proxy_admin_owner = m.account(0)?;

        let implementation = m.contract("SCI", ContractSpec::Sci)?;
        let initialize =
            Sci::initializeCall { initialOwner: proxy_admin_owner, registryAddress: registry };
        let proxy = m.contract(
            "TransparentUpgradeableProxy",
            ContractSpec::TransparentProxy {
                logic: implementation.address,
                initial_owner: proxy_admin_owner,
                data: initialize.abi_encode().into(),
            },
        )?;
        let proxy_admin = m.derived("ProxyAdmin", &proxy)?;

        Ok(ProxyOutput { proxy: proxy.address, proxy_admin, implementation: implementation.address })
    }
}

/// Exposes the proxy as the `SCI` contract, recorded as `SciModule#SCI`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SciModule;

/// Outputs of [`SciModule`] and [`SciUpgradeModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SciOutput {
    /// SCI, at the proxy address.
    pub sci: Address,
    /// The proxy.
    pub proxy: Address,
    /// Admin allowed to upgrade the proxy.
    pub proxy_admin: Address,
}

impl Module for SciModule {
    const ID: &'static str = "SciModule";
    type Output = SciOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let ProxyOutput { proxy, proxy_admin, .. } = m.use_module::<ProxyModule>()?;
        let sci = m.contract_at("SCI", proxy);
        Ok(SciOutput { sci, proxy, proxy_admin })
    }
}

/// Deploys a new `SCI` implementation and points the proxy at it through the
/// `ProxyAdmin`. Proxy address and storage are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeModule;

impl Module for UpgradeModule {
    const ID: &'static str = "UpgradeModule";
    type Output = ProxyOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let SciOutput { proxy, proxy_admin, .. } = m.use_module::<SciModule>()?;
        let implementation = m.contract("SCI", ContractSpec::Sci)?;

        let upgrade = ProxyAdmin::upgradeAndCallCall {
            proxy,
            implementation: implementation.address,
            data: Default::default(),
        };
        m.call("ProxyAdmin.upgradeAndCall", proxy_admin, upgrade.abi_encode().into())?;

        Ok(ProxyOutput { proxy, proxy_admin, implementation: implementation.address })
    }
}

/// Exposes the upgraded proxy as the `SCI` contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct SciUpgradeModule;

impl Module for SciUpgradeModule {
    const ID: &'static str = "SciUpgradeModule";
    type Output = SciOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let ProxyOutput { proxy, proxy_admin, .. } = m.use_module::<UpgradeModule>()?;
        let sci = m.contract_at("SCI", proxy);
        Ok(SciOutput { sci, proxy, proxy_admin })
    }
}
