use crate::{chain::fallback, AccessControl, CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes},
    sol_types::{SolCall, SolInterface, SolValue},
};
use sci_bindings::{
    SciRegistry,
    SuperChainTargetRegistrar::SuperChainTargetRegistrarCalls,
};
use sci_constants::Role;
use tracing::debug;

/// Destination-side registrar receiving relayed registrations.
///
/// Inbound calls must come from the canonical messenger, and the origin
/// sender reported by the messenger must hold [`Role::RegisterDomain`] here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRegistrar {
    access: AccessControl,
    registry: Address,
    messenger: Address,
}

impl TargetRegistrar {
    /// Create a target registrar.
    pub fn new(
        registry: Address,
        messenger: Address,
        admin: Address,
        default_admin_delay: u64,
    ) -> Self {
        Self { access: AccessControl::new(admin, default_admin_delay), registry, messenger }
    }

    /// The registry calls are forwarded to.
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// The canonical messenger.
    pub const fn messenger(&self) -> Address {
        self.messenger
    }

    /// The role table.
    pub const fn access(&self) -> &AccessControl {
        &self.access
    }

    pub(crate) fn access_mut(&mut self) -> &mut AccessControl {
        &mut self.access
    }

    /// Check that the call was relayed by the messenger on behalf of an
    /// authorised origin sender.
    fn authorise(&self, chain: &Chain, caller: Address) -> Result<Address> {
        if caller != self.messenger {
            return Err(ContractError::InvalidMessageSender { sender: caller });
        }
        let sender =
            chain.messenger(self.messenger)?.x_domain_sender().ok_or(ContractError::SenderNotSet)?;
        self.access.check_role(Role::RegisterDomain, sender)?;
        Ok(sender)
    }
}

pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let selector = input.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok());
    if !selector.is_some_and(SuperChainTargetRegistrarCalls::valid_selector) {
        return fallback(chain, ctx, input);
    }

    let registrar = chain.target_registrar(ctx.address)?;
    let registry = registrar.registry;
    let forward = match SuperChainTargetRegistrarCalls::abi_decode(input)? {
        SuperChainTargetRegistrarCalls::REGISTER_DOMAIN_ROLE(_) => {
            return Ok(Role::RegisterDomain.id().abi_encode().into())
        }
        SuperChainTargetRegistrarCalls::registerDomain(c) => {
            let sender = registrar.authorise(chain, ctx.caller)?;
            debug!(domain_hash = %c.domainHash, owner = %c.owner, %sender, "relayed registration");
            SciRegistry::registerDomainCall { owner: c.owner, domainHash: c.domainHash }.abi_encode()
        }
        SuperChainTargetRegistrarCalls::registerDomainWithVerifier(c) => {
            let sender = registrar.authorise(chain, ctx.caller)?;
            debug!(domain_hash = %c.domainHash, owner = %c.owner, %sender, "relayed registration");
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::{grant_role_call, ContractSpec, CrossDomainMessage};
    use alloy::primitives::{b256, B256};
    use sci_bindings::{CrossDomainMessenger, SuperChainTargetRegistrar};

    const ADMIN: Address = Address::repeat_byte(0xaa);
    const RELAYER: Address = Address::repeat_byte(0xee);
    const ORIGIN: Address = Address::repeat_byte(0x0e);
    const OWNER: Address = Address::repeat_byte(0x01);
    const DOMAIN: B256 = b256!("0x77ebf9a801c579f50495cbb82e12145b476276f47b480b84c367a30b04d18e15");

    struct Setup {
        chain: Chain,
        registry: Address,
        messenger: Address,
        target: Address,
    }

    fn setup() -> Setup {
        let mut chain = Chain::new(10);
        let registry =
            chain.deploy(ADMIN, ContractSpec::Registry { default_admin_delay: 0 }).unwrap().address;
        let messenger =
            chain.deploy(ADMIN, ContractSpec::Messenger { relayer: RELAYER }).unwrap().address;
        let target = chain
            .deploy(
                ADMIN,
                ContractSpec::TargetRegistrar { registry, messenger, default_admin_delay: 0 },
            )
            .unwrap()
            .address;
        chain.transact(ADMIN, registry, grant_role_call(Role::RegistrarManager, ADMIN)).unwrap();
        chain.transact(ADMIN, registry, grant_role_call(Role::Registrar, target)).unwrap();
        Setup { chain, registry, messenger, target }
    }

    fn relayed(s: &Setup, nonce: u64) -> CrossDomainMessage {
        CrossDomainMessage {
            nonce,
            sender: ORIGIN,
            target: s.target,
            message: SuperChainTargetRegistrar::registerDomainCall { owner: OWNER, domainHash: DOMAIN }
                .abi_encode()
                .into(),
            gas_limit: 1_000_000,
        }
    }

    #[test]
    fn direct_calls_are_rejected() {
        let mut s = setup();
        let err = s
            .chain
            .send(
                ORIGIN,
                s.target,
                &SuperChainTargetRegistrar::registerDomainCall { owner: OWNER, domainHash: DOMAIN },
            )
            .unwrap_err();
        assert_eq!(err, ContractError::InvalidMessageSender { sender: ORIGIN });
    }

    #[test]
    fn origin_sender_needs_role() {
        let mut s = setup();
        let msg = relayed(&s, 0);

        let receipt = s.chain.send(RELAYER, s.messenger, &msg.relay_call()).unwrap();
        assert!(receipt.event::<CrossDomainMessenger::FailedRelayedMessage>().is_some());
        let failure = s.chain.messenger(s.messenger).unwrap().failure(msg.id()).cloned().unwrap();
        assert!(failure.is_unauthorized(ORIGIN, Role::RegisterDomain));
        assert!(s.chain.registry(s.registry).unwrap().is_empty());

        s.chain.transact(ADMIN, s.target, grant_role_call(Role::RegisterDomain, ORIGIN)).unwrap();
        let receipt = s.chain.send(RELAYER, s.messenger, &msg.relay_call()).unwrap();
        assert!(receipt.event::<CrossDomainMessenger::RelayedMessage>().is_some());
        assert!(s.chain.registry(s.registry).unwrap().is_owner(DOMAIN, OWNER));
    }
}
