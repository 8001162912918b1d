use alloy::primitives::{Address, Bytes, B256};
use sci_bindings::{
    EnsRegistrar, IAccessControl, IOwnable, IPausable, PublicListVerifier, Sci, SciRegistry,
    SuperChainTargetRegistrar, TransparentUpgradeableProxy,
};
use sci_constants::Role;

/// Result type for contract execution.
pub type Result<T, E = ContractError> = std::result::Result<T, E>;

/// Reasons a call reverts.
///
/// Every variant is terminal for the transaction that raised it: state
/// changes made by the reverted call frame are discarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The account lacks the role required by the call.
    #[error("account {account} is missing role {}", display_role(.role))]
    Unauthorized {
        /// The account that made (or was attributed) the call.
        account: Address,
        /// The role it needed.
        role: B256,
    },
    /// `renounceRole` called with a confirmation other than the caller.
    #[error("bad confirmation for role renouncement")]
    BadConfirmation,
    /// The account does not own the domain in the ENS registry.
    #[error("account {account} is not the ENS owner of {domain_hash}")]
    AccountIsNotEnsOwner {
        /// The account claiming ownership.
        account: Address,
        /// The domain hash (ENS node).
        domain_hash: B256,
    },
    /// The account does not own the domain in the SCI registry.
    #[error("account {account} is not the owner of domain {domain_hash}")]
    AccountIsNotDomainOwner {
        /// The account claiming ownership.
        account: Address,
        /// The domain hash.
        domain_hash: B256,
    },
    /// The registry refuses to record the zero address as an owner.
    #[error("invalid owner for domain {domain_hash}")]
    InvalidDomainOwner {
        /// The domain hash.
        domain_hash: B256,
    },
    /// A relayed call did not come from the canonical messenger.
    #[error("invalid message sender {sender}")]
    InvalidMessageSender {
        /// The direct caller.
        sender: Address,
    },
    /// The messenger is not relaying a message.
    #[error("cross-domain message sender is not set")]
    SenderNotSet,
    /// A message was relayed by someone other than the bridge relayer.
    #[error("{caller} is not allowed to relay new messages")]
    OnlyRelayer {
        /// The direct caller.
        caller: Address,
    },
    /// The message was already relayed successfully.
    #[error("message {0} has already been relayed")]
    MessageAlreadyRelayed(B256),
    /// The relay transaction neither delivered the message nor recorded it
    /// as failed.
    #[error("no delivery or failure recorded for message {0}")]
    RelayNotRecorded(B256),
    /// The registry is paused.
    #[error("enforced pause")]
    EnforcedPause,
    /// `unpause` on a registry that is not paused.
    #[error("expected pause")]
    ExpectedPause,
    /// The account is not the owner of an ownable contract.
    #[error("account {account} is not the owner")]
    OwnableUnauthorizedAccount {
        /// The caller.
        account: Address,
    },
    /// Ownership cannot be transferred to the zero address.
    #[error("invalid owner {owner}")]
    OwnableInvalidOwner {
        /// The rejected owner.
        owner: Address,
    },
    /// The contract was already initialized, or is an implementation with
    /// initializers disabled.
    #[error("invalid initialization")]
    InvalidInitialization,
    /// The proxy admin tried to call through the proxy.
    #[error("proxy admin cannot fallback to proxy target")]
    ProxyDeniedAdminAccess,
    /// The account does not own the ENS node it tries to modify.
    #[error("account {account} does not own ENS node {node}")]
    NotNodeOwner {
        /// The caller.
        account: Address,
        /// The ENS node.
        node: B256,
    },
    /// Argument arrays differ in length.
    #[error("argument length mismatch")]
    LengthMismatch,
    /// No contract at the address, or not the expected kind of contract.
    #[error("no {expected} contract at {address}")]
    NoContract {
        /// The called address.
        address: Address,
        /// The kind of contract that was expected.
        expected: &'static str,
    },
    /// The contract has no function with the given selector.
    #[error("contract at {address} has no function with selector {selector}")]
    UnknownSelector {
        /// The called address.
        address: Address,
        /// The selector, hex encoded.
        selector: Bytes,
    },
    /// Calldata could not be decoded.
    #[error("failed to decode calldata: {0}")]
    Decode(String),
}

fn display_role(role: &B256) -> String {
    Role::from_id(*role).map(|r| r.name().to_string()).unwrap_or_else(|| role.to_string())
}

impl From<alloy::sol_types::Error> for ContractError {
    fn from(err: alloy::sol_types::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl ContractError {
    /// Shorthand for a missing role.
    pub fn unauthorized(account: Address, role: impl Into<B256>) -> Self {
        Self::Unauthorized { account, role: role.into() }
    }

    /// True if this is a missing-role error for `account` and `role`.
    pub fn is_unauthorized(&self, account: Address, role: Role) -> bool {
        matches!(self, Self::Unauthorized { account: a, role: r } if *a == account && *r == role.id())
    }

    /// ABI-encode the error as revert data, where the contracts define a
    /// custom error for it.
    pub fn revert_data(&self) -> Option<Bytes> {
        use alloy::sol_types::SolError;

        let data = match *self {
            Self::Unauthorized { account, role } => {
                IAccessControl::AccessControlUnauthorizedAccount { account, neededRole: role }
                    .abi_encode()
            }
            Self::BadConfirmation => IAccessControl::AccessControlBadConfirmation {}.abi_encode(),
            Self::AccountIsNotEnsOwner { account, domain_hash } => {
                EnsRegistrar::AccountIsNotEnsOwner { account, domainHash: domain_hash }
                    .abi_encode()
            }
            Self::AccountIsNotDomainOwner { account, domain_hash } => {
                SciRegistry::AccountIsNotDomainOwner { account, domainHash: domain_hash }
                    .abi_encode()
            }
            Self::InvalidMessageSender { sender } => {
                SuperChainTargetRegistrar::InvalidMessageSender { sender }.abi_encode()
            }
            Self::EnforcedPause => IPausable::EnforcedPause {}.abi_encode(),
            Self::ExpectedPause => IPausable::ExpectedPause {}.abi_encode(),
            Self::OwnableUnauthorizedAccount { account } => {
                IOwnable::OwnableUnauthorizedAccount { account }.abi_encode()
            }
            Self::OwnableInvalidOwner { owner } => {
                IOwnable::OwnableInvalidOwner { owner }.abi_encode()
            }
            Self::InvalidInitialization => Sci::InvalidInitialization {}.abi_encode(),
            Self::ProxyDeniedAdminAccess => {
                TransparentUpgradeableProxy::ProxyDeniedAdminAccess {}.abi_encode()
            }
            Self::LengthMismatch => PublicListVerifier::LengthMismatch {}.abi_encode(),
            _ => return None,
        };
        Some(data.into())
    }
}
