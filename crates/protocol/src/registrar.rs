use crate::{chain::fallback, AccessControl, CallContext, Chain, Result};
use alloy::{
    primitives::{Address, Bytes},
    sol_types::{SolCall, SolInterface, SolValue},
};
use sci_bindings::{
    SciRegistrar::SciRegistrarCalls,
    SciRegistry,
};
use sci_constants::Role;
use tracing::debug;

/// Local front door to the registry, gated by [`Role::RegisterDomain`].
///
/// Holds no domain state. It must itself hold [`Role::Registrar`] on the
/// registry for forwarded calls to succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SciRegistrar {
    access: AccessControl,
    registry: Address,
}

impl SciRegistrar {
    /// Create a registrar forwarding to `registry`.
    pub fn new(registry: Address, admin: Address, default_admin_delay: u64) -> Self {
        Self { access: AccessControl::new(admin, default_admin_delay), registry }
    }

    /// The registry calls are forwarded to.
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// The role table.
    pub const fn access(&self) -> &AccessControl {
        &self.access
    }

    pub(crate) fn access_mut(&mut self) -> &mut AccessControl {
        &mut self.access
    }
}

pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let selector = input.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok());
    if !selector.is_some_and(SciRegistrarCalls::valid_selector) {
        return fallback(chain, ctx, input);
    }

    let registrar = chain.sci_registrar(ctx.address)?;
    let registry = registrar.registry;
    let forward = match SciRegistrarCalls::abi_decode(input)? {
        SciRegistrarCalls::REGISTER_DOMAIN_ROLE(_) => {
            return Ok(Role::RegisterDomain.id().abi_encode().into())
        }
        SciRegistrarCalls::registerDomain(c) => {
            registrar.access.check_role(Role::RegisterDomain, ctx.caller)?;
            debug!(domain_hash = %c.domainHash, owner = %c.owner, "forwarding registration");
            SciRegistry::registerDomainCall { owner: c.owner, domainHash: c.domainHash }.abi_encode()
        }
        SciRegistrarCalls::registerDomainWithVerifier(c) => {
            registrar.access.check_role(Role::RegisterDomain, ctx.caller)?;
            debug!(
                domain_hash = %c.domainHash,
                owner = %c.owner,
                verifier = %c.verifier,
                "forwarding registration"
            );
            SciRegistry::registerDomainWithVerifierCall {
                owner: c.owner,
                domainHash: c.domainHash,
                verifier: c.verifier,
            }
            .abi_encode()
        }
    };
    chain.call(ctx.address, registry, &forward)?;
    Ok(Bytes::new())
}
