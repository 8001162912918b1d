#![allow(clippy::too_many_arguments)]
#![allow(missing_docs)]
use alloy::{
    primitives::{keccak256, Address, Bytes, B256, U256},
    sol_types::SolCall,
};

mod access {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface IAccessControl {
            event RoleGranted(bytes32 indexed role, address indexed account, address indexed sender);
            event RoleRevoked(bytes32 indexed role, address indexed account, address indexed sender);
            event RoleAdminChanged(bytes32 indexed role, bytes32 indexed previousAdminRole, bytes32 indexed newAdminRole);

            error AccessControlUnauthorizedAccount(address account, bytes32 neededRole);
            error AccessControlBadConfirmation();

            function hasRole(bytes32 role, address account) external view returns (bool);
            function getRoleAdmin(bytes32 role) external view returns (bytes32);
            function grantRole(bytes32 role, address account) external;
            function revokeRole(bytes32 role, address account) external;
            function renounceRole(bytes32 role, address callerConfirmation) external;
        }
    );

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface IPausable {
            event Paused(address account);
            event Unpaused(address account);

            error EnforcedPause();
            error ExpectedPause();

            function paused() external view returns (bool);
            function pause() external;
            function unpause() external;
        }
    );

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface IOwnable {
            event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

            error OwnableUnauthorizedAccount(address account);
            error OwnableInvalidOwner(address owner);

            function owner() external view returns (address);
            function transferOwnership(address newOwner) external;
        }
    );

    impl Copy for IAccessControl::RoleGranted {}
    impl Copy for IAccessControl::RoleRevoked {}
    impl Copy for IAccessControl::AccessControlUnauthorizedAccount {}
    impl Copy for IOwnable::OwnableUnauthorizedAccount {}
}
pub use access::{IAccessControl, IOwnable, IPausable};

mod registry {
    use super::*;

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface SciRegistry {
            struct DomainRecord {
                address owner;
                address verifier;
                uint256 registeredAt;
                uint256 verifierSetAt;
            }

            event DomainRegistered(address indexed registrar, address indexed owner, bytes32 indexed domainHash);
            event OwnerSet(address indexed sender, bytes32 indexed domainHash, address indexed owner);
            event VerifierSet(address indexed sender, bytes32 indexed domainHash, address indexed verifier);

            error AccountIsNotDomainOwner(address account, bytes32 domainHash);

            function registerDomain(address owner, bytes32 domainHash) external;
            function registerDomainWithVerifier(address owner, bytes32 domainHash, address verifier) external;
            function setVerifier(bytes32 domainHash, address verifier) external;

            function isDomainOwner(bytes32 domainHash, address account) external view returns (bool);
            function domainOwner(bytes32 domainHash) external view returns (address);
            function domainVerifier(bytes32 domainHash) external view returns (address);
            function domainVerifierSetTime(bytes32 domainHash) external view returns (uint256);
            function domainHashToRecord(bytes32 domainHash) external view returns (DomainRecord memory);
        }
    );

    impl Copy for SciRegistry::DomainRecord {}
    impl Copy for SciRegistry::DomainRegistered {}
    impl Copy for SciRegistry::OwnerSet {}
    impl Copy for SciRegistry::VerifierSet {}
    impl Copy for SciRegistry::AccountIsNotDomainOwner {}

    impl SciRegistry::DomainRecord {
        /// Get the owner of the domain.
        pub const fn owner(&self) -> Address {
            self.owner
        }

        /// Get the verifier of the domain, `None` if unset.
        pub fn verifier(&self) -> Option<Address> {
            (!self.verifier.is_zero()).then_some(self.verifier)
        }

        /// Get the registration timestamp (discarding high bytes).
        pub const fn registered_at(&self) -> u64 {
            self.registeredAt.as_limbs()[0]
        }

        /// Get the timestamp at which the verifier was set (discarding high
        /// bytes). Zero if no verifier was set.
        pub const fn verifier_set_at(&self) -> u64 {
            self.verifierSetAt.as_limbs()[0]
        }
    }
}
pub use registry::SciRegistry;

mod registrars {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface SciRegistrar {
            function REGISTER_DOMAIN_ROLE() external view returns (bytes32);
            function registerDomain(address owner, bytes32 domainHash) external;
            function registerDomainWithVerifier(address owner, bytes32 domainHash, address verifier) external;
        }
    );

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface EnsRegistrar {
            error AccountIsNotEnsOwner(address account, bytes32 domainHash);

            function REGISTER_DOMAIN_GAS_LIMIT() external view returns (uint32);
            function REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT() external view returns (uint32);
            function registerDomain(address owner, bytes32 domainHash) external;
            function registerDomainWithVerifier(address owner, bytes32 domainHash, address verifier) external;
        }
    );

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface SuperChainTargetRegistrar {
            error InvalidMessageSender(address sender);

            function REGISTER_DOMAIN_ROLE() external view returns (bytes32);
            function registerDomain(address owner, bytes32 domainHash) external;
            function registerDomainWithVerifier(address owner, bytes32 domainHash, address verifier) external;
        }
    );

    impl Copy for EnsRegistrar::AccountIsNotEnsOwner {}
    impl Copy for SuperChainTargetRegistrar::InvalidMessageSender {}
}
pub use registrars::{EnsRegistrar, SciRegistrar, SuperChainTargetRegistrar};

mod ens {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface Ens {
            event NewOwner(bytes32 indexed node, bytes32 indexed label, address owner);
            event Transfer(bytes32 indexed node, address owner);

            function owner(bytes32 node) external view returns (address);
            function recordExists(bytes32 node) external view returns (bool);
            function setOwner(bytes32 node, address owner) external;
            function setSubnodeOwner(bytes32 node, bytes32 label, address owner) external returns (bytes32);
        }
    );

    impl Copy for Ens::NewOwner {}
    impl Copy for Ens::Transfer {}
}
pub use ens::Ens;

mod messenger {
    use super::*;

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface CrossDomainMessenger {
            event SentMessage(address indexed target, address sender, bytes message, uint256 messageNonce, uint256 gasLimit);
            event RelayedMessage(bytes32 indexed msgHash);
            event FailedRelayedMessage(bytes32 indexed msgHash);

            function sendMessage(address target, bytes message, uint32 minGasLimit) external payable;
            function relayMessage(uint256 nonce, address sender, address target, uint256 value, uint256 minGasLimit, bytes message) external payable;
            function xDomainMessageSender() external view returns (address);
            function successfulMessages(bytes32 msgHash) external view returns (bool);
            function failedMessages(bytes32 msgHash) external view returns (bool);
        }
    );

    impl Copy for CrossDomainMessenger::RelayedMessage {}
    impl Copy for CrossDomainMessenger::FailedRelayedMessage {}

    impl CrossDomainMessenger::SentMessage {
        /// Get the message nonce (discarding high bytes).
        pub const fn nonce(&self) -> u64 {
            self.messageNonce.as_limbs()[0]
        }

        /// Get the gas limit requested by the sender (discarding high bytes).
        pub const fn gas_limit(&self) -> u64 {
            self.gasLimit.as_limbs()[0]
        }
    }

    impl CrossDomainMessenger::relayMessageCall {
        /// Id of the relayed message: `keccak256` of the ABI-encoded call.
        pub fn message_hash(&self) -> B256 {
            keccak256(self.abi_encode())
        }
    }

    /// Hash a cross-domain message the way the destination messenger
    /// identifies it: `keccak256` of the ABI-encoded `relayMessage` call.
    pub fn hash_cross_domain_message(
        nonce: u64,
        sender: Address,
        target: Address,
        gas_limit: u64,
        message: &Bytes,
    ) -> B256 {
        let call = CrossDomainMessenger::relayMessageCall {
            nonce: U256::from(nonce),
            sender,
            target,
            value: U256::ZERO,
            minGasLimit: U256::from(gas_limit),
            message: message.clone(),
        };
        call.message_hash()
    }
}
pub use messenger::{hash_cross_domain_message, CrossDomainMessenger};

mod verifier {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface PublicListVerifier {
            event AddressAdded(bytes32 indexed domainHash, address indexed contractAddress, uint256 chainId);
            event AddressRemoved(bytes32 indexed domainHash, address indexed contractAddress, uint256 chainId);

            error LengthMismatch();

            function addAddresses(bytes32 domainHash, address[] contractAddresses, uint256[][] chainIds) external;
            function removeAddresses(bytes32 domainHash, address[] contractAddresses, uint256[][] chainIds) external;
            function isVerified(bytes32 domainHash, address contractAddress, uint256 chainId) external view returns (uint256);
        }
    );

    impl Copy for PublicListVerifier::AddressAdded {}
    impl Copy for PublicListVerifier::AddressRemoved {}
}
pub use verifier::PublicListVerifier;

mod sci {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface Sci {
            event RegistrySet(address oldRegistry, address newRegistry);
            event Initialized(uint64 version);

            error InvalidInitialization();

            function initialize(address initialOwner, address registryAddress) external;
            function setRegistry(address newRegistry) external;
            function registry() external view returns (address);
            function isVerifiedForDomainHash(bytes32 domainHash, address contractAddress, uint256 chainId) external view returns (uint256);
            function isVerifiedForMultipleDomainHashes(bytes32[] domainHashes, address contractAddress, uint256 chainId) external view returns (uint256[]);
        }
    );

    impl Copy for Sci::RegistrySet {}
}
pub use sci::Sci;

mod proxy {
    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface TransparentUpgradeableProxy {
            event Upgraded(address indexed implementation);
            event AdminChanged(address previousAdmin, address newAdmin);

            error ProxyDeniedAdminAccess();

            function upgradeToAndCall(address newImplementation, bytes data) external payable;
        }
    );

    alloy::sol!(
        #[derive(Debug, PartialEq, Eq)]
        interface ProxyAdmin {
            function upgradeAndCall(address proxy, address implementation, bytes data) external payable;
        }
    );

    impl Copy for TransparentUpgradeableProxy::Upgraded {}
    impl Copy for TransparentUpgradeableProxy::AdminChanged {}
}
pub use proxy::{ProxyAdmin, TransparentUpgradeableProxy};
