use alloy::{
    primitives::{Address, B256, U256},
    sol_types::SolValue,
};
use sci_bindings::{namehash, EnsRegistrar, IPausable, PublicListVerifier, Sci, SciRegistry};
use sci_constants::Role;
use sci_protocol::{grant_role_call, verification_time, ContractError, RelayStatus, ANY_CHAIN};
use sci_test_utils::TwoChainHarness;

const WETH: Address = Address::repeat_byte(0xee);

/// Register `a.eth` through ENS with the public list verifier attached.
fn registered() -> (TwoChainHarness, B256) {
    let mut h = TwoChainHarness::new();
    let owner = h.deployer();
    let domain_hash = namehash("a.eth");
    let call = EnsRegistrar::registerDomainWithVerifierCall {
        owner,
        domainHash: domain_hash,
        verifier: h.protocol.public_list_verifier,
    };
    h.l1.send(owner, h.ens_registrar, &call).unwrap();
    assert!(h.relay()[0].is_relayed());
    (h, domain_hash)
}

fn is_verified(h: &TwoChainHarness, domain_hash: B256, contract: Address, chain_id: u64) -> U256 {
    let call = Sci::isVerifiedForDomainHashCall {
        domainHash: domain_hash,
        contractAddress: contract,
        chainId: U256::from(chain_id),
    };
    U256::abi_decode(&h.l2.view_call(h.protocol.sci, &call).unwrap()).unwrap()
}

#[test]
fn listed_contracts_are_verified_through_sci() {
    let (mut h, domain_hash) = registered();
    assert_eq!(is_verified(&h, domain_hash, WETH, 1), U256::ZERO);

    let add = PublicListVerifier::addAddressesCall {
        domainHash: domain_hash,
        contractAddresses: vec![WETH],
        chainIds: vec![vec![U256::from(1)]],
    };
    h.l2.send(h.deployer(), h.protocol.public_list_verifier, &add).unwrap();
    let listed_at = U256::from(h.l2.timestamp());

    assert_eq!(is_verified(&h, domain_hash, WETH, 1), listed_at);
    assert_eq!(is_verified(&h, domain_hash, WETH, 10), U256::ZERO);
    assert_eq!(
        verification_time(&h.l2, h.protocol.sci_registry, domain_hash, WETH, U256::from(1)).unwrap(),
        listed_at
    );

    let many = Sci::isVerifiedForMultipleDomainHashesCall {
        domainHashes: vec![domain_hash, namehash("b.eth")],
        contractAddress: WETH,
        chainId: U256::from(1),
    };
    let out = h.l2.view_call(h.protocol.sci, &many).unwrap();
    assert_eq!(Vec::<U256>::abi_decode(&out).unwrap(), vec![listed_at, U256::ZERO]);
}

#[test]
fn wildcard_entries_match_every_chain() {
    let (mut h, domain_hash) = registered();
    let add = PublicListVerifier::addAddressesCall {
        domainHash: domain_hash,
        contractAddresses: vec![WETH],
        chainIds: vec![vec![ANY_CHAIN]],
    };
    h.l2.send(h.deployer(), h.protocol.public_list_verifier, &add).unwrap();
    assert_ne!(is_verified(&h, domain_hash, WETH, 1), U256::ZERO);
    assert_ne!(is_verified(&h, domain_hash, WETH, 8453), U256::ZERO);
}

#[test]
fn only_the_domain_owner_edits_the_list() {
    let (mut h, domain_hash) = registered();
    let stranger = h.accounts[5];
    let add = PublicListVerifier::addAddressesCall {
        domainHash: domain_hash,
        contractAddresses: vec![WETH],
        chainIds: vec![vec![U256::from(1)]],
    };
    let err = h.l2.send(stranger, h.protocol.public_list_verifier, &add).unwrap_err();
    assert_eq!(err, ContractError::AccountIsNotDomainOwner { account: stranger, domain_hash });

    let mismatched = PublicListVerifier::addAddressesCall {
        domainHash: domain_hash,
        contractAddresses: vec![WETH],
        chainIds: vec![],
    };
    let err = h.l2.send(h.deployer(), h.protocol.public_list_verifier, &mismatched).unwrap_err();
    assert_eq!(err, ContractError::LengthMismatch);
}

#[test]
fn verifier_can_be_replaced_by_the_owner() {
    let (mut h, domain_hash) = registered();
    let other = Address::repeat_byte(0x42);
    let call = SciRegistry::setVerifierCall { domainHash: domain_hash, verifier: other };

    let err = h.l2.send(h.accounts[1], h.protocol.sci_registry, &call).unwrap_err();
    assert_eq!(err, ContractError::AccountIsNotDomainOwner { account: h.accounts[1], domain_hash });

    let receipt = h.l2.send(h.deployer(), h.protocol.sci_registry, &call).unwrap();
    let set: SciRegistry::VerifierSet = receipt.event().unwrap();
    assert_eq!(set.verifier, other);
    let record = h.l2.registry(h.protocol.sci_registry).unwrap().record(domain_hash);
    assert_eq!(record.verifier(), Some(other));
    assert!(record.verifier_set_at() > record.registered_at());
}

#[test]
fn paused_registry_fails_relays_until_unpaused() {
    let mut h = TwoChainHarness::new();
    let deployer = h.deployer();
    let registry = h.protocol.sci_registry;

    let err = h.l2.send(deployer, registry, &IPausable::pauseCall {}).unwrap_err();
    assert!(err.is_unauthorized(deployer, Role::Pauser));
    h.l2.transact(deployer, registry, grant_role_call(Role::Pauser, deployer)).unwrap();
    h.l2.send(deployer, registry, &IPausable::pauseCall {}).unwrap();

    let domain_hash = namehash("a.eth");
    let call = EnsRegistrar::registerDomainCall { owner: deployer, domainHash: domain_hash };
    h.l1.send(deployer, h.ens_registrar, &call).unwrap();
    let outcome = h.relay().remove(0);
    assert_eq!(outcome.status, RelayStatus::Failed(ContractError::EnforcedPause));

    h.l2.send(deployer, registry, &IPausable::unpauseCall {}).unwrap();
    assert!(h.bridge.relay(&mut h.l2, outcome.message).is_relayed());
    assert!(h.l2.registry(registry).unwrap().is_owner(domain_hash, deployer));
}

#[test]
fn sci_registry_pointer_is_owner_only() {
    let (mut h, domain_hash) = registered();
    let deployer = h.deployer();
    let storage = *h.l2.sci_storage(h.protocol.sci).unwrap();
    assert_eq!(storage.owner(), deployer);
    assert_eq!(storage.registry(), h.protocol.sci_registry);

    let call = Sci::setRegistryCall { newRegistry: Address::repeat_byte(0x01) };
    let err = h.l2.send(h.accounts[1], h.protocol.sci, &call).unwrap_err();
    assert_eq!(err, ContractError::OwnableUnauthorizedAccount { account: h.accounts[1] });

    let again = Sci::initializeCall { initialOwner: h.accounts[1], registryAddress: Address::ZERO };
    assert_eq!(h.l2.send(h.accounts[1], h.protocol.sci, &again).unwrap_err(), ContractError::InvalidInitialization);

    // The record is served through SCI too.
    let record = Sci::isVerifiedForDomainHashCall {
        domainHash: domain_hash,
        contractAddress: WETH,
        chainId: U256::from(1),
    };
    assert!(h.l2.view_call(h.protocol.sci, &record).is_ok());
}
