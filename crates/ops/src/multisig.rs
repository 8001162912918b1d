use alloy::{
    primitives::{keccak256, Address, Bytes, B256, U256},
    sol_types::{SolCall, SolValue},
};
use sci_protocol::{Call, Chain, ContractError, Receipt};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Errors raised by multisig proposals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// Threshold is zero or exceeds the owner count.
    #[error("invalid threshold {threshold} for {owners} owners")]
    InvalidThreshold {
        /// Requested threshold.
        threshold: usize,
        /// Number of owners.
        owners: usize,
    },
    /// The account is not an owner.
    #[error("{0} is not a multisig owner")]
    NotOwner(Address),
    /// The proposal belongs to another multisig.
    #[error("proposal for {proposal} submitted to multisig {multisig}")]
    WrongMultisig {
        /// Multisig the proposal was built for.
        proposal: Address,
        /// Multisig executing it.
        multisig: Address,
    },
    /// A proposal with no calls.
    #[error("empty batch")]
    EmptyBatch,
    /// No pending proposal holds this nonce.
    #[error("no pending proposal with nonce {nonce}")]
    NotPending {
        /// The requested nonce.
        nonce: u64,
    },
    /// Not enough approvals.
    #[error("proposal {nonce} has {approvals} of {threshold} approvals")]
    BelowThreshold {
        /// Proposal nonce.
        nonce: u64,
        /// Collected approvals.
        approvals: usize,
        /// Required approvals.
        threshold: usize,
    },
    /// Proposals execute in nonce order.
    #[error("proposal nonce {got}, expected {expected}")]
    NonceMismatch {
        /// The proposal's nonce.
        got: u64,
        /// The next executable nonce.
        expected: u64,
    },
    /// The batch transaction reverted. None of its calls took effect.
    #[error("batch {nonce} reverted: {source}")]
    Reverted {
        /// Proposal nonce.
        nonce: u64,
        /// Revert reason.
        #[source]
        source: ContractError,
    },
}

/// A batch of calls awaiting approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    multisig: Address,
    nonce: u64,
    calls: Vec<Call>,
    approvals: BTreeSet<Address>,
}

impl Proposal {
    /// Nonce of the proposal.
    pub const fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The calls, in execution order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Owners who approved.
    pub fn approvals(&self) -> impl Iterator<Item = Address> + '_ {
        self.approvals.iter().copied()
    }

    /// Hash committing to the multisig, nonce and calls.
    pub fn hash(&self) -> B256 {
        let calls: Vec<(Address, Bytes)> =
            self.calls.iter().map(|c| (c.to, c.data.clone())).collect();
        keccak256((self.multisig, U256::from(self.nonce), calls).abi_encode())
    }
}

/// Collects calls into a single proposal. Holding the builder borrows the
/// multisig mutably, so proposals are produced by one writer at a time.
#[derive(Debug)]
pub struct BatchBuilder<'a> {
    multisig: &'a mut Multisig,
    calls: Vec<Call>,
}

impl BatchBuilder<'_> {
    /// Append a raw call.
    pub fn push(&mut self, to: Address, data: Bytes) -> &mut Self {
        self.calls.push(Call { to, data });
        self
    }

    /// Append a typed call.
    pub fn push_call<C: SolCall>(&mut self, to: Address, call: &C) -> &mut Self {
        self.calls.push(Call::new(to, call));
        self
    }

    /// Number of calls so far.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// True if no call was added.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Turn the calls into a proposal with the next nonce.
    pub fn propose(self) -> Result<Proposal, BatchError> {
        self.multisig.propose(self.calls)
    }
}

/// An m-of-n account executing approved batches atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multisig {
    account: Address,
    owners: BTreeSet<Address>,
    threshold: usize,
    next_proposal: u64,
    executed: u64,
}

impl Multisig {
    /// Create a multisig acting as `account`.
    pub fn new(
        account: Address,
        owners: impl IntoIterator<Item = Address>,
        threshold: usize,
    ) -> Result<Self, BatchError> {
        let owners: BTreeSet<_> = owners.into_iter().collect();
        if threshold == 0 || threshold > owners.len() {
            return Err(BatchError::InvalidThreshold { threshold, owners: owners.len() });
        }
        Ok(Self { account, owners, threshold, next_proposal: 0, executed: 0 })
    }

    /// The account calls are sent from.
    pub const fn account(&self) -> Address {
        self.account
    }

    /// Required approvals.
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Nonce of the next proposal to execute.
    pub const fn nonce(&self) -> u64 {
        self.executed
    }

    /// Start a batch.
    pub fn batch(&mut self) -> BatchBuilder<'_> {
        BatchBuilder { multisig: self, calls: Vec::new() }
    }

    /// Create a proposal from `calls` with the next nonce.
    pub fn propose(&mut self, calls: Vec<Call>) -> Result<Proposal, BatchError> {
        if calls.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        let nonce = self.next_proposal;
        self.next_proposal += 1;
        debug!(multisig = %self.account, nonce, calls = calls.len(), "proposal created");
        Ok(Proposal { multisig: self.account, nonce, calls, approvals: BTreeSet::new() })
    }

    /// Create an empty proposal that takes the place of the pending proposal
    /// at `nonce`. Once approved and executed it consumes the nonce, so a
    /// batch that can never succeed stops blocking the ones after it.
    pub fn reject(&self, nonce: u64) -> Result<Proposal, BatchError> {
        if nonce < self.executed || nonce >= self.next_proposal {
            return Err(BatchError::NotPending { nonce });
        }
        debug!(multisig = %self.account, nonce, "rejection proposed");
        Ok(Proposal { multisig: self.account, nonce, calls: Vec::new(), approvals: BTreeSet::new() })
    }

    /// Record `owner`'s approval. Approving twice is harmless.
    pub fn approve(&self, proposal: &mut Proposal, owner: Address) -> Result<(), BatchError> {
        self.check_proposal(proposal)?;
        if !self.owners.contains(&owner) {
            return Err(BatchError::NotOwner(owner));
        }
        proposal.approvals.insert(owner);
        Ok(())
    }

    fn check_proposal(&self, proposal: &Proposal) -> Result<(), BatchError> {
        if proposal.multisig != self.account {
            return Err(BatchError::WrongMultisig {
                proposal: proposal.multisig,
                multisig: self.account,
            });
        }
        Ok(())
    }

    /// Execute an approved proposal as one transaction. Proposals execute in
    /// nonce order. A reverted batch leaves the nonce unchanged until it is
    /// retried successfully or replaced through [`Multisig::reject`].
    #[instrument(skip_all, fields(multisig = %self.account, nonce = proposal.nonce))]
    pub fn execute(&mut self, chain: &mut Chain, proposal: &Proposal) -> Result<Receipt, BatchError> {
        self.check_proposal(proposal)?;
        if proposal.nonce != self.executed {
            return Err(BatchError::NonceMismatch { got: proposal.nonce, expected: self.executed });
        }
        let approvals = proposal.approvals.len();
        if approvals < self.threshold {
            return Err(BatchError::BelowThreshold {
                nonce: proposal.nonce,
                approvals,
                threshold: self.threshold,
            });
        }

        let receipt = chain
            .transact_batch(self.account, &proposal.calls)
            .map_err(|source| BatchError::Reverted { nonce: proposal.nonce, source })?;
        self.executed += 1;
        debug!(calls = proposal.calls.len(), "batch executed");
        Ok(receipt)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use sci_bindings::SciRegistry;
    use sci_constants::Role;
    use sci_protocol::{grant_role_call, ContractSpec};

    const SAFE: Address = Address::repeat_byte(0x5a);
    const A: Address = Address::repeat_byte(0x01);
    const B: Address = Address::repeat_byte(0x02);
    const C: Address = Address::repeat_byte(0x03);

    fn setup() -> (Chain, Address, Multisig) {
        let mut chain = Chain::new(10);
        let registry =
            chain.deploy(SAFE, ContractSpec::Registry { default_admin_delay: 0 }).unwrap().address;
        (chain, registry, Multisig::new(SAFE, [A, B, C], 2).unwrap())
    }

    #[test]
    fn threshold_must_fit_owners() {
        assert!(matches!(Multisig::new(SAFE, [A], 2), Err(BatchError::InvalidThreshold { .. })));
        assert!(matches!(Multisig::new(SAFE, [A], 0), Err(BatchError::InvalidThreshold { .. })));
    }

    #[test]
    fn nonces_strictly_increase() {
        let (_, registry, mut safe) = setup();
        let mut batch = safe.batch();
        batch.push(registry, grant_role_call(Role::Pauser, A));
        let first = batch.propose().unwrap();
        let mut batch = safe.batch();
        batch.push(registry, grant_role_call(Role::Pauser, B));
        let second = batch.propose().unwrap();
        assert_eq!(first.nonce() + 1, second.nonce());
        assert_ne!(first.hash(), second.hash());
    }

    #[test]
    fn executes_after_threshold_atomically() {
        let (mut chain, registry, mut safe) = setup();
        let mut batch = safe.batch();
        batch.push(registry, grant_role_call(Role::RegistrarManager, SAFE));
        batch.push(registry, grant_role_call(Role::Registrar, SAFE));
        batch.push_call(registry, &SciRegistry::registerDomainCall { owner: A, domainHash: B256::ZERO });
        let mut proposal = batch.propose().unwrap();

        safe.approve(&mut proposal, A).unwrap();
        let err = safe.execute(&mut chain, &proposal).unwrap_err();
        assert_eq!(err, BatchError::BelowThreshold { nonce: 0, approvals: 1, threshold: 2 });

        assert_eq!(safe.approve(&mut proposal, SAFE), Err(BatchError::NotOwner(SAFE)));
        safe.approve(&mut proposal, B).unwrap();
        let receipt = safe.execute(&mut chain, &proposal).unwrap();
        assert_eq!(receipt.events::<SciRegistry::DomainRegistered>().count(), 1);
        assert_eq!(safe.nonce(), 1);

        let err = safe.execute(&mut chain, &proposal).unwrap_err();
        assert_eq!(err, BatchError::NonceMismatch { got: 0, expected: 1 });
    }

    #[test]
    fn reverted_batch_changes_nothing() {
        let (mut chain, registry, mut safe) = setup();
        let mut batch = safe.batch();
        batch.push(registry, grant_role_call(Role::Pauser, A));
        // SAFE is not a registrar.
        batch.push_call(registry, &SciRegistry::registerDomainCall { owner: A, domainHash: B256::ZERO });
        let mut proposal = batch.propose().unwrap();
        safe.approve(&mut proposal, A).unwrap();
        safe.approve(&mut proposal, C).unwrap();

        let err = safe.execute(&mut chain, &proposal).unwrap_err();
        assert!(matches!(err, BatchError::Reverted { nonce: 0, .. }));
        assert!(!chain.access(registry).unwrap().has_role(Role::Pauser, A));
        assert_eq!(safe.nonce(), 0);
    }

    #[test]
    fn rejection_unblocks_later_nonces() {
        let (mut chain, registry, mut safe) = setup();
        let mut batch = safe.batch();
        batch.push_call(registry, &SciRegistry::registerDomainCall { owner: A, domainHash: B256::ZERO });
        let mut stuck = batch.propose().unwrap();
        let mut batch = safe.batch();
        batch.push(registry, grant_role_call(Role::Pauser, A));
        let mut next = batch.propose().unwrap();
        for owner in [A, B] {
            safe.approve(&mut stuck, owner).unwrap();
            safe.approve(&mut next, owner).unwrap();
        }

        assert!(matches!(safe.execute(&mut chain, &stuck), Err(BatchError::Reverted { nonce: 0, .. })));
        assert_eq!(
            safe.execute(&mut chain, &next).unwrap_err(),
            BatchError::NonceMismatch { got: 1, expected: 0 }
        );
        assert_eq!(safe.reject(2).unwrap_err(), BatchError::NotPending { nonce: 2 });

        let mut rejection = safe.reject(0).unwrap();
        assert!(rejection.calls().is_empty());
        assert_ne!(rejection.hash(), stuck.hash());
        safe.approve(&mut rejection, C).unwrap();
        assert!(matches!(safe.execute(&mut chain, &rejection), Err(BatchError::BelowThreshold { .. })));
        safe.approve(&mut rejection, B).unwrap();
        let receipt = safe.execute(&mut chain, &rejection).unwrap();
        assert!(receipt.logs.is_empty());
        assert_eq!(safe.nonce(), 1);

        // The replaced batch can no longer run.
        assert_eq!(
            safe.execute(&mut chain, &stuck).unwrap_err(),
            BatchError::NonceMismatch { got: 0, expected: 1 }
        );
        assert_eq!(safe.reject(0).unwrap_err(), BatchError::NotPending { nonce: 0 });

        safe.execute(&mut chain, &next).unwrap();
        assert!(chain.access(registry).unwrap().has_role(Role::Pauser, A));
        assert_eq!(safe.nonce(), 2);
    }
}
