use crate::{chain::fallback, AccessControl, CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::{SolInterface, SolValue},
};
use sci_bindings::{
    IPausable::{self, IPausableCalls},
    SciRegistry::{self, DomainRecord, SciRegistryCalls},
};
use sci_constants::Role;
use std::collections::BTreeMap;
use tracing::debug;

/// The authoritative domain-ownership ledger.
///
/// Records are only written by holders of [`Role::Registrar`], except for
/// the verifier, which the domain owner may change. While paused, no record
/// can be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    access: AccessControl,
    paused: bool,
    records: BTreeMap<B256, DomainRecord>,
}

impl Registry {
    /// Create a registry administered by `admin`. Registrars are managed by
    /// holders of [`Role::RegistrarManager`].
    pub fn new(admin: Address, default_admin_delay: u64) -> Self {
        let mut access = AccessControl::new(admin, default_admin_delay);
        access.set_role_admin(Role::Registrar, Role::RegistrarManager);
        Self { access, paused: false, records: BTreeMap::new() }
    }

    /// The role table.
    pub const fn access(&self) -> &AccessControl {
        &self.access
    }

    pub(crate) fn access_mut(&mut self) -> &mut AccessControl {
        &mut self.access
    }

    /// True while mutations are blocked.
    pub const fn paused(&self) -> bool {
        self.paused
    }

    /// The record of `domain_hash`. Unregistered domains read as the
    /// all-zero record.
    pub fn record(&self, domain_hash: B256) -> DomainRecord {
        self.records.get(&domain_hash).copied().unwrap_or_else(empty_record)
    }

    /// Owner of `domain_hash`, zero if unregistered.
    pub fn owner_of(&self, domain_hash: B256) -> Address {
        self.records.get(&domain_hash).map(|r| r.owner).unwrap_or_default()
    }

    /// True if `account` owns `domain_hash`.
    pub fn is_owner(&self, domain_hash: B256, account: Address) -> bool {
        !account.is_zero() && self.owner_of(domain_hash) == account
    }

    /// Number of registered domains.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no domain is registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    const fn when_not_paused(&self) -> Result<()> {
        if self.paused {
            Err(ContractError::EnforcedPause)
        } else {
            Ok(())
        }
    }

    fn only_owner(&self, domain_hash: B256, account: Address) -> Result<()> {
        if self.is_owner(domain_hash, account) {
            Ok(())
        } else {
            Err(ContractError::AccountIsNotDomainOwner { account, domain_hash })
        }
    }
}

pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let Some(selector) = input.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok()) else {
        return fallback(chain, ctx, input);
    };
    if SciRegistryCalls::valid_selector(selector) {
        return execute_registry(chain, ctx, SciRegistryCalls::abi_decode(input)?);
    }
    if IPausableCalls::valid_selector(selector) {
        return execute_pausable(chain, ctx, IPausableCalls::abi_decode(input)?);
    }
    fallback(chain, ctx, input)
}

fn execute_registry(chain: &mut Chain, ctx: CallContext, call: SciRegistryCalls) -> Result<Bytes> {
    let now = U256::from(chain.timestamp());
    let registry = chain.registry_mut(ctx.address)?;

    match call {
        SciRegistryCalls::registerDomain(c) => {
            register(chain, ctx, c.owner, c.domainHash, None)
        }
        SciRegistryCalls::registerDomainWithVerifier(c) => {
            register(chain, ctx, c.owner, c.domainHash, Some(c.verifier))
        }
        SciRegistryCalls::setVerifier(c) => {
            registry.when_not_paused()?;
            registry.only_owner(c.domainHash, ctx.caller)?;
            if let Some(record) = registry.records.get_mut(&c.domainHash) {
                record.verifier = c.verifier;
                record.verifierSetAt = now;
            }
            debug!(domain_hash = %c.domainHash, verifier = %c.verifier, "verifier set");
            chain.emit(
                ctx.address,
                &SciRegistry::VerifierSet {
                    sender: ctx.caller,
                    domainHash: c.domainHash,
                    verifier: c.verifier,
                },
            );
            Ok(Bytes::new())
        }
        SciRegistryCalls::isDomainOwner(c) => {
            Ok(registry.is_owner(c.domainHash, c.account).abi_encode().into())
        }
        SciRegistryCalls::domainOwner(c) => {
            Ok(registry.owner_of(c.domainHash).abi_encode().into())
        }
        SciRegistryCalls::domainVerifier(c) => {
            Ok(registry.record(c.domainHash).verifier.abi_encode().into())
        }
        SciRegistryCalls::domainVerifierSetTime(c) => {
            Ok(registry.record(c.domainHash).verifierSetAt.abi_encode().into())
        }
        SciRegistryCalls::domainHashToRecord(c) => {
            Ok(registry.record(c.domainHash).abi_encode().into())
        }
    }
}

const fn empty_record() -> DomainRecord {
    DomainRecord {
        owner: Address::ZERO,
        verifier: Address::ZERO,
        registeredAt: U256::ZERO,
        verifierSetAt: U256::ZERO,
    }
}

fn register(
    chain: &mut Chain,
    ctx: CallContext,
    owner: Address,
    domain_hash: B256,
    verifier: Option<Address>,
) -> Result<Bytes> {
    let now = U256::from(chain.timestamp());
    let registry = chain.registry_mut(ctx.address)?;
    registry.when_not_paused()?;
    registry.access.check_role(Role::Registrar, ctx.caller)?;
    if owner.is_zero() {
        return Err(ContractError::InvalidDomainOwner { domain_hash });
    }

    let verifier = verifier.unwrap_or_default();
    let verifier_set_at = if verifier.is_zero() { U256::ZERO } else { now };
    registry.records.insert(
        domain_hash,
        DomainRecord { owner, verifier, registeredAt: now, verifierSetAt: verifier_set_at },
    );
    debug!(%domain_hash, %owner, %verifier, registrar = %ctx.caller, "domain registered");

    chain.emit(
        ctx.address,
        &SciRegistry::DomainRegistered { registrar: ctx.caller, owner, domainHash: domain_hash },
    );
    chain.emit(
        ctx.address,
        &SciRegistry::OwnerSet { sender: ctx.caller, domainHash: domain_hash, owner },
    );
    if !verifier.is_zero() {
        chain.emit(
            ctx.address,
            &SciRegistry::VerifierSet { sender: ctx.caller, domainHash: domain_hash, verifier },
        );
    }
    Ok(Bytes::new())
}

fn execute_pausable(chain: &mut Chain, ctx: CallContext, call: IPausableCalls) -> Result<Bytes> {
    let registry = chain.registry_mut(ctx.address)?;
    match call {
        IPausableCalls::paused(_) => Ok(registry.paused.abi_encode().into()),
        IPausableCalls::pause(_) => {
            registry.access.check_role(Role::Pauser, ctx.caller)?;
            registry.when_not_paused()?;
            registry.paused = true;
            debug!(registry = %ctx.address, "paused");
            chain.emit(ctx.address, &IPausable::Paused { account: ctx.caller });
            Ok(Bytes::new())
        }
        IPausableCalls::unpause(_) => {
            registry.access.check_role(Role::Pauser, ctx.caller)?;
            if !registry.paused {
                return Err(ContractError::ExpectedPause);
            }
            registry.paused = false;
            debug!(registry = %ctx.address, "unpaused");
            chain.emit(ctx.address, &IPausable::Unpaused { account: ctx.caller });
            Ok(Bytes::new())
        }
    }
}
