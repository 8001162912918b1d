use super::SciRegistryModule;
use crate::{DeployError, DeploymentTarget, Module, ModuleBuilder};
use alloy::primitives::Address;
use sci_protocol::ContractSpec;

/// Deploys the `PublicListVerifier` on top of the registry.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicListVerifierModule;

/// Outputs of [`PublicListVerifierModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicListVerifierOutput {
    /// The verifier.
    pub public_list_verifier: Address,
    /// The registry it reads ownership from.
    pub sci_registry: Address,
}

impl Module for PublicListVerifierModule {
    const ID: &'static str = "PublicListVerifier";
    type Output = PublicListVerifierOutput;

    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError> {
        let registry = m.use_module::<SciRegistryModule>()?.sci_registry;
        let verifier = m.contract("PublicListVerifier", ContractSpec::PublicListVerifier { registry })?;
        Ok(PublicListVerifierOutput { public_list_verifier: verifier.address, sci_registry: registry })
    }
}
