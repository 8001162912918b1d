use crate::{chain::unknown_selector, CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::{SolInterface, SolValue},
};
use sci_bindings::PublicListVerifier::{self as Abi, PublicListVerifierCalls};
use std::collections::BTreeMap;
use tracing::debug;

/// Chain id matching every chain.
pub const ANY_CHAIN: U256 = U256::MAX;

/// Verifier where domain owners publish the contracts they vouch for.
///
/// Entries are `(domain hash, contract, chain id)` triples, stamped with the
/// time they were added. Only the registry owner of the domain may add or
/// remove entries, and a domain that is not registered verifies nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicListVerifier {
    registry: Address,
    entries: BTreeMap<(B256, Address, U256), u64>,
}

impl PublicListVerifier {
    /// Create a verifier backed by `registry`.
    pub const fn new(registry: Address) -> Self {
        Self { registry, entries: BTreeMap::new() }
    }

    /// The registry consulted for domain ownership.
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Time the entry was added, ignoring domain registration. Exact chain
    /// matches take precedence over [`ANY_CHAIN`] entries.
    pub fn added_at(&self, domain_hash: B256, contract: Address, chain_id: U256) -> Option<u64> {
        self.entries
            .get(&(domain_hash, contract, chain_id))
            .or_else(|| self.entries.get(&(domain_hash, contract, ANY_CHAIN)))
            .copied()
    }
}

/// Time at which `contract` on `chain_id` was verified for `domain_hash` by
/// the verifier at `verifier`, or zero.
pub fn verified_at(
    chain: &Chain,
    verifier: Address,
    domain_hash: B256,
    contract: Address,
    chain_id: U256,
) -> Result<U256> {
    let verifier = chain.verifier(verifier)?;
    if chain.registry(verifier.registry)?.owner_of(domain_hash).is_zero() {
        return Ok(U256::ZERO);
    }
    Ok(verifier.added_at(domain_hash, contract, chain_id).map(U256::from).unwrap_or_default())
}

pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let call = PublicListVerifierCalls::abi_decode(input).map_err(|_| unknown_selector(ctx, input))?;

    match call {
        PublicListVerifierCalls::addAddresses(c) => {
            update(chain, ctx, c.domainHash, &c.contractAddresses, &c.chainIds, true)
        }
        PublicListVerifierCalls::removeAddresses(c) => {
            update(chain, ctx, c.domainHash, &c.contractAddresses, &c.chainIds, false)
        }
        PublicListVerifierCalls::isVerified(c) => {
            let at = verified_at(chain, ctx.address, c.domainHash, c.contractAddress, c.chainId)?;
            Ok(at.abi_encode().into())
        }
    }
}

fn update(
    chain: &mut Chain,
    ctx: CallContext,
    domain_hash: B256,
    contracts: &[Address],
    chain_ids: &[Vec<U256>],
    add: bool,
) -> Result<Bytes> {
    if contracts.len() != chain_ids.len() {
        return Err(ContractError::LengthMismatch);
    }
    let registry = chain.verifier(ctx.address)?.registry;
    if !chain.registry(registry)?.is_owner(domain_hash, ctx.caller) {
        return Err(ContractError::AccountIsNotDomainOwner { account: ctx.caller, domain_hash });
    }

    let now = chain.timestamp();
    for (contract, ids) in contracts.iter().zip(chain_ids) {
        for chain_id in ids {
            let key = (domain_hash, *contract, *chain_id);
            let verifier = chain.verifier_mut(ctx.address)?;
            if add {
                // Re-adding keeps the original timestamp.
                verifier.entries.entry(key).or_insert(now);
                chain.emit(
                    ctx.address,
                    &Abi::AddressAdded { domainHash: domain_hash, contractAddress: *contract, chainId: *chain_id },
                );
            } else if verifier.entries.remove(&key).is_some() {
                chain.emit(
                    ctx.address,
                    &Abi::AddressRemoved { domainHash: domain_hash, contractAddress: *contract, chainId: *chain_id },
                );
            }
        }
    }
    debug!(%domain_hash, contracts = contracts.len(), add, "public list updated");
    Ok(Bytes::new())
}
