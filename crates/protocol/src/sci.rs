use crate::{chain::unknown_selector, verifier, CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::{SolCall, SolInterface, SolValue},
};
use sci_bindings::{
    IOwnable::{self, IOwnableCalls},
    Sci::{self as Abi, SciCalls},
    SciRegistry,
};
use tracing::debug;

const DISABLED: u64 = u64::MAX;

/// Storage of the SCI facade.
///
/// Lives in the proxy, so it survives implementation upgrades.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SciStorage {
    initialized: u64,
    owner: Address,
    registry: Address,
}

impl SciStorage {
    /// Owner of the facade.
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Registry the facade reads from.
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// True once `initialize` ran.
    pub const fn is_initialized(&self) -> bool {
        self.initialized != 0
    }

    fn only_owner(&self, account: Address) -> Result<()> {
        if account == self.owner {
            Ok(())
        } else {
            Err(ContractError::OwnableUnauthorizedAccount { account })
        }
    }
}

/// An `SCI` implementation contract. Its own storage is never initialized;
/// it is used through a proxy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Sci {
    storage: SciStorage,
}

impl Sci {
    /// Deploy an implementation with initializers disabled.
    pub const fn new() -> Self {
        Self {
            storage: SciStorage { initialized: DISABLED, owner: Address::ZERO, registry: Address::ZERO },
        }
    }

    pub(crate) const fn storage(&self) -> &SciStorage {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut SciStorage {
        &mut self.storage
    }
}

impl Default for Sci {
    fn default() -> Self {
        Self::new()
    }
}

/// Time `contract` on `chain_id` was verified for `domain_hash` through the
/// registry at `registry`, or zero if the domain has no verifier.
pub fn verification_time(
    chain: &Chain,
    registry: Address,
    domain_hash: B256,
    contract: Address,
    chain_id: U256,
) -> Result<U256> {
    match chain.registry(registry)?.record(domain_hash).verifier() {
        Some(v) => verifier::verified_at(chain, v, domain_hash, contract, chain_id),
        None => Ok(U256::ZERO),
    }
}

/// Execute an SCI call against the storage at `ctx.address`, which is either
/// an implementation or a proxy delegating to one.
pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let selector = input.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok());
    let Some(selector) = selector else {
        return Err(unknown_selector(ctx, input));
    };

    if SciCalls::valid_selector(selector) {
        return execute_sci(chain, ctx, SciCalls::abi_decode(input)?);
    }
    if IOwnableCalls::valid_selector(selector) {
        return execute_ownable(chain, ctx, IOwnableCalls::abi_decode(input)?);
    }
    if selector == SciRegistry::domainHashToRecordCall::SELECTOR {
        let call = SciRegistry::domainHashToRecordCall::abi_decode(input)?;
        let registry = chain.sci_storage(ctx.address)?.registry;
        return Ok(chain.registry(registry)?.record(call.domainHash).abi_encode().into());
    }
    Err(unknown_selector(ctx, input))
}

fn execute_sci(chain: &mut Chain, ctx: CallContext, call: SciCalls) -> Result<Bytes> {
    let storage = *chain.sci_storage(ctx.address)?;

    match call {
        SciCalls::initialize(c) => {
            if storage.is_initialized() {
                return Err(ContractError::InvalidInitialization);
            }
            if c.initialOwner.is_zero() {
                return Err(ContractError::OwnableInvalidOwner { owner: c.initialOwner });
            }
            *chain.sci_storage_mut(ctx.address)? =
                SciStorage { initialized: 1, owner: c.initialOwner, registry: c.registryAddress };
            debug!(sci = %ctx.address, owner = %c.initialOwner, registry = %c.registryAddress, "initialized");
            chain.emit(
                ctx.address,
                &IOwnable::OwnershipTransferred { previousOwner: Address::ZERO, newOwner: c.initialOwner },
            );
            chain.emit(
                ctx.address,
                &Abi::RegistrySet { oldRegistry: Address::ZERO, newRegistry: c.registryAddress },
            );
            chain.emit(ctx.address, &Abi::Initialized { version: 1 });
            Ok(Bytes::new())
        }
        SciCalls::setRegistry(c) => {
            storage.only_owner(ctx.caller)?;
            chain.sci_storage_mut(ctx.address)?.registry = c.newRegistry;
            debug!(sci = %ctx.address, registry = %c.newRegistry, "registry set");
            chain.emit(
                ctx.address,
                &Abi::RegistrySet { oldRegistry: storage.registry, newRegistry: c.newRegistry },
            );
            Ok(Bytes::new())
        }
        SciCalls::registry(_) => Ok(storage.registry.abi_encode().into()),
        SciCalls::isVerifiedForDomainHash(c) => {
            let at = verification_time(
                chain,
                storage.registry,
                c.domainHash,
                c.contractAddress,
                c.chainId,
            )?;
            Ok(at.abi_encode().into())
        }
        SciCalls::isVerifiedForMultipleDomainHashes(c) => {
            let times = c
                .domainHashes
                .iter()
                .map(|hash| {
                    verification_time(chain, storage.registry, *hash, c.contractAddress, c.chainId)
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(times.abi_encode().into())
        }
    }
}

fn execute_ownable(chain: &mut Chain, ctx: CallContext, call: IOwnableCalls) -> Result<Bytes> {
    let storage = chain.sci_storage_mut(ctx.address)?;
    match call {
        IOwnableCalls::owner(_) => Ok(storage.owner.abi_encode().into()),
        IOwnableCalls::transferOwnership(c) => {
            storage.only_owner(ctx.caller)?;
            if c.newOwner.is_zero() {
                return Err(ContractError::OwnableInvalidOwner { owner: c.newOwner });
            }
            let previous = std::mem::replace(&mut storage.owner, c.newOwner);
            chain.emit(
                ctx.address,
                &IOwnable::OwnershipTransferred { previousOwner: previous, newOwner: c.newOwner },
            );
            Ok(Bytes::new())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ContractSpec;

    const OWNER: Address = Address::repeat_byte(0x01);

    #[test]
    fn implementation_cannot_be_initialized() {
        let mut chain = Chain::new(1);
        let sci = chain.deploy(OWNER, ContractSpec::Sci).unwrap().address;
        let err = chain
            .send(OWNER, sci, &Abi::initializeCall { initialOwner: OWNER, registryAddress: OWNER })
            .unwrap_err();
        assert_eq!(err, ContractError::InvalidInitialization);
        assert!(chain.sci_storage(sci).unwrap().owner().is_zero());
    }

    #[test]
    fn unknown_function_is_rejected() {
        let mut chain = Chain::new(1);
        let sci = chain.deploy(OWNER, ContractSpec::Sci).unwrap().address;
        let err = chain.transact(OWNER, sci, Bytes::from_static(&[1, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, ContractError::UnknownSelector { .. }));
    }
}
