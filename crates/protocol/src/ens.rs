use crate::{chain::unknown_selector, CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::{SolCall, SolInterface, SolValue},
};
use sci_bindings::{
    subnode, CrossDomainMessenger,
    Ens::{self, EnsCalls},
    EnsRegistrar::EnsRegistrarCalls,
    SuperChainTargetRegistrar,
};
use sci_constants::RelayGasLimits;
use std::collections::BTreeMap;
use tracing::debug;

/// Minimal ENS registry: node ownership only.
///
/// The deployer owns the root node. Owners of a node can hand out its
/// subnodes with `setSubnodeOwner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsRegistry {
    owners: BTreeMap<B256, Address>,
}

impl EnsRegistry {
    /// Create a registry whose root node is owned by `root_owner`.
    pub fn new(root_owner: Address) -> Self {
        Self { owners: BTreeMap::from([(B256::ZERO, root_owner)]) }
    }

    /// Owner of `node`, zero if there is no record.
    pub fn owner(&self, node: B256) -> Address {
        self.owners.get(&node).copied().unwrap_or_default()
    }

    /// True if `node` has a record.
    pub fn record_exists(&self, node: B256) -> bool {
        self.owners.contains_key(&node)
    }

    fn authorised(&self, node: B256, account: Address) -> Result<()> {
        if !account.is_zero() && self.owner(node) == account {
            Ok(())
        } else {
            Err(ContractError::NotNodeOwner { account, node })
        }
    }
}

pub(crate) fn execute_registry(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let call = EnsCalls::abi_decode(input).map_err(|_| unknown_selector(ctx, input))?;
    let ens = chain.ens_registry_mut(ctx.address)?;

    match call {
        EnsCalls::owner(c) => Ok(ens.owner(c.node).abi_encode().into()),
        EnsCalls::recordExists(c) => Ok(ens.record_exists(c.node).abi_encode().into()),
        EnsCalls::setOwner(c) => {
            ens.authorised(c.node, ctx.caller)?;
            ens.owners.insert(c.node, c.owner);
            chain.emit(ctx.address, &Ens::Transfer { node: c.node, owner: c.owner });
            Ok(Bytes::new())
        }
        EnsCalls::setSubnodeOwner(c) => {
            ens.authorised(c.node, ctx.caller)?;
            let node = subnode(c.node, c.label);
            ens.owners.insert(node, c.owner);
            debug!(%node, owner = %c.owner, "ens subnode assigned");
            chain.emit(ctx.address, &Ens::NewOwner { node: c.node, label: c.label, owner: c.owner });
            Ok(node.abi_encode().into())
        }
    }
}

/// Origin-side registrar gated by ENS ownership.
///
/// Holds no domain state: a successful call only dispatches a cross-domain
/// message to the target registrar. Nothing is reported back if the message
/// later fails on the destination chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EnsRegistrar {
    ens: Address,
    messenger: Address,
    target: Address,
    gas_limits: RelayGasLimits,
}

impl EnsRegistrar {
    /// Create a registrar.
    pub const fn new(
        ens: Address,
        messenger: Address,
        target: Address,
        gas_limits: RelayGasLimits,
    ) -> Self {
        Self { ens, messenger, target, gas_limits }
    }

    /// The ENS registry used as ownership oracle.
    pub const fn ens(&self) -> Address {
        self.ens
    }

    /// The origin-side messenger.
    pub const fn messenger(&self) -> Address {
        self.messenger
    }

    /// The destination registrar messages are addressed to.
    pub const fn target(&self) -> Address {
        self.target
    }

    /// Gas limits attached to relayed calls.
    pub const fn gas_limits(&self) -> RelayGasLimits {
        self.gas_limits
    }
}

pub(crate) fn execute_registrar(
    chain: &mut Chain,
    ctx: CallContext,
    input: &[u8],
) -> Result<Bytes> {
    let call = EnsRegistrarCalls::abi_decode(input).map_err(|_| unknown_selector(ctx, input))?;
    let registrar = *chain.ens_registrar(ctx.address)?;
    let limits = registrar.gas_limits;

    let (domain_hash, payload, gas_limit) = match call {
        EnsRegistrarCalls::REGISTER_DOMAIN_GAS_LIMIT(_) => {
            return Ok(U256::from(limits.register_domain).abi_encode().into())
        }
        EnsRegistrarCalls::REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT(_) => {
            return Ok(U256::from(limits.register_domain_with_verifier).abi_encode().into())
        }
        EnsRegistrarCalls::registerDomain(c) => {
            if ens_owner(chain, registrar.ens, c.domainHash)? != Some(c.owner) {
                return Err(ContractError::AccountIsNotEnsOwner {
                    account: c.owner,
                    domain_hash: c.domainHash,
                });
            }
            let payload = SuperChainTargetRegistrar::registerDomainCall {
                owner: c.owner,
                domainHash: c.domainHash,
            };
            (c.domainHash, payload.abi_encode(), limits.for_variant(false))
        }
        EnsRegistrarCalls::registerDomainWithVerifier(c) => {
            let current = ens_owner(chain, registrar.ens, c.domainHash)?;
            if ctx.caller != c.owner || current != Some(c.owner) {
                return Err(ContractError::AccountIsNotEnsOwner {
                    account: ctx.caller,
                    domain_hash: c.domainHash,
                });
            }
            let payload = SuperChainTargetRegistrar::registerDomainWithVerifierCall {
                owner: c.owner,
                domainHash: c.domainHash,
                verifier: c.verifier,
            };
            (c.domainHash, payload.abi_encode(), limits.for_variant(true))
        }
    };

    debug!(%domain_hash, target = %registrar.target, gas_limit, "dispatching registration");
    let send = CrossDomainMessenger::sendMessageCall {
        target: registrar.target,
        message: payload.into(),
        minGasLimit: gas_limit,
    };
    chain.call(ctx.address, registrar.messenger, &send.abi_encode())?;
    Ok(Bytes::new())
}

/// Owner of `node` in the ENS registry at `ens`, `None` if the node has no
/// owner.
fn ens_owner(chain: &Chain, ens: Address, node: B256) -> Result<Option<Address>> {
    let owner = chain.ens_registry(ens)?.owner(node);
    Ok((!owner.is_zero()).then_some(owner))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ContractSpec;
    use sci_bindings::{labelhash, namehash, EnsRegistrar};

    const DEPLOYER: Address = Address::repeat_byte(0xaa);
    const ALICE: Address = Address::repeat_byte(0x01);
    const BOB: Address = Address::repeat_byte(0x02);

    struct Setup {
        chain: Chain,
        ens: Address,
        messenger: Address,
        registrar: Address,
        target: Address,
    }

    fn setup() -> Setup {
        let mut chain = Chain::new(11155111);
        let ens = chain.deploy(DEPLOYER, ContractSpec::EnsRegistry).unwrap().address;
        let messenger =
            chain.deploy(DEPLOYER, ContractSpec::Messenger { relayer: DEPLOYER }).unwrap().address;
        let target = Address::repeat_byte(0x77);
        let registrar = chain
            .deploy(
                DEPLOYER,
                ContractSpec::EnsRegistrar {
                    ens,
                    messenger,
                    target,
                    gas_limits: RelayGasLimits::default(),
                },
            )
            .unwrap()
            .address;

        chain
            .send(
                DEPLOYER,
                ens,
                &Ens::setSubnodeOwnerCall { node: B256::ZERO, label: labelhash("eth"), owner: DEPLOYER },
            )
            .unwrap();
        chain
            .send(
                DEPLOYER,
                ens,
                &Ens::setSubnodeOwnerCall {
                    node: namehash("eth"),
                    label: labelhash("alice"),
                    owner: ALICE,
                },
            )
            .unwrap();
        Setup { chain, ens, messenger, registrar, target }
    }

    #[test]
    fn subnode_owners_follow_namehash() {
        let s = setup();
        let ens = s.chain.ens_registry(s.ens).unwrap();
        assert_eq!(ens.owner(namehash("alice.eth")), ALICE);
        assert!(!ens.record_exists(namehash("bob.eth")));
    }

    #[test]
    fn only_node_owner_assigns_subnodes() {
        let mut s = setup();
        let err = s
            .chain
            .send(
                BOB,
                s.ens,
                &Ens::setSubnodeOwnerCall { node: namehash("eth"), label: labelhash("bob"), owner: BOB },
            )
            .unwrap_err();
        assert_eq!(err, ContractError::NotNodeOwner { account: BOB, node: namehash("eth") });
    }

    #[test]
    fn unknown_domain_is_rejected() {
        let mut s = setup();
        let domain_hash = namehash("bob.eth");
        let err = s
            .chain
            .send(BOB, s.registrar, &EnsRegistrar::registerDomainCall { owner: BOB, domainHash: domain_hash })
            .unwrap_err();
        assert_eq!(err, ContractError::AccountIsNotEnsOwner { account: BOB, domain_hash });
    }

    #[test]
    fn wrong_owner_is_rejected() {
        let mut s = setup();
        let domain_hash = namehash("alice.eth");
        let err = s
            .chain
            .send(BOB, s.registrar, &EnsRegistrar::registerDomainCall { owner: BOB, domainHash: domain_hash })
            .unwrap_err();
        assert_eq!(err, ContractError::AccountIsNotEnsOwner { account: BOB, domain_hash });
        assert!(s.chain.messenger(s.messenger).unwrap().outbox().is_empty());
    }

    #[test]
    fn with_verifier_requires_owner_as_caller() {
        let mut s = setup();
        let domain_hash = namehash("alice.eth");
        let call = EnsRegistrar::registerDomainWithVerifierCall {
            owner: ALICE,
            domainHash: domain_hash,
            verifier: BOB,
        };
        let err = s.chain.send(BOB, s.registrar, &call).unwrap_err();
        assert_eq!(err, ContractError::AccountIsNotEnsOwner { account: BOB, domain_hash });

        s.chain.send(ALICE, s.registrar, &call).unwrap();
        let outbox = s.chain.messenger(s.messenger).unwrap().outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].gas_limit, 1_500_000);
    }

    #[test]
    fn dispatches_message_to_target() {
        let mut s = setup();
        let domain_hash = namehash("alice.eth");
        // Anyone may register on behalf of the ENS owner.
        let receipt = s
            .chain
            .send(BOB, s.registrar, &EnsRegistrar::registerDomainCall { owner: ALICE, domainHash: domain_hash })
            .unwrap();

        let sent: CrossDomainMessenger::SentMessage = receipt.event().unwrap();
        assert_eq!(sent.target, s.target);
        assert_eq!(sent.sender, s.registrar);
        assert_eq!(sent.gas_limit(), 1_000_000);
        let payload = SuperChainTargetRegistrar::registerDomainCall::abi_decode(&sent.message).unwrap();
        assert_eq!(payload.owner, ALICE);
        assert_eq!(payload.domainHash, domain_hash);
    }

    #[test]
    fn exposes_gas_limits() {
        let s = setup();
        let out = s.chain.view_call(s.registrar, &EnsRegistrar::REGISTER_DOMAIN_GAS_LIMITCall {}).unwrap();
        assert_eq!(U256::abi_decode(&out).unwrap(), U256::from(1_000_000));
    }
}
