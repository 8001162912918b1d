use alloy::{
    primitives::Address,
    sol_types::{SolCall, SolInterface},
};
use sci_bindings::{
    namehash, CrossDomainMessenger, EnsRegistrar, SciRegistrar,
    SuperChainTargetRegistrar::{self, SuperChainTargetRegistrarCalls},
};
use sci_constants::{RelayGasLimits, Role};
use sci_protocol::{grant_role_call, ContractError, RelayStatus};
use sci_test_utils::{tracing::init_tracing, TwoChainHarness};

#[test]
fn ens_owner_registers_across_chains() {
    init_tracing();
    let mut h = TwoChainHarness::new();
    let owner = h.deployer();
    let domain_hash = namehash("a.eth");

    let call = EnsRegistrar::registerDomainCall { owner, domainHash: domain_hash };
    let receipt = h.l1.send(owner, h.ens_registrar, &call).unwrap();

    // Dispatched, not yet registered.
    let sent: CrossDomainMessenger::SentMessage = receipt.event().unwrap();
    assert_eq!(sent.target, h.target_registrar);
    assert_eq!(sent.sender, h.ens_registrar);
    assert_eq!(sent.gas_limit(), 1_000_000);
    let SuperChainTargetRegistrarCalls::registerDomain(payload) =
        SuperChainTargetRegistrarCalls::abi_decode(&sent.message).unwrap()
    else {
        panic!("unexpected payload");
    };
    assert_eq!(payload.owner, owner);
    assert_eq!(payload.domainHash, domain_hash);
    assert!(h.l2.registry(h.protocol.sci_registry).unwrap().is_empty());

    let outcomes = h.relay();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_relayed());

    let record = h.l2.registry(h.protocol.sci_registry).unwrap().record(domain_hash);
    assert_eq!(record.owner(), owner);
    assert_eq!(record.verifier(), None);
    assert_eq!(record.registered_at(), h.l2.timestamp());
}

#[test]
fn verifier_variant_uses_its_own_gas_limit() {
    let mut h = TwoChainHarness::new();
    let owner = h.deployer();
    let verifier = h.protocol.public_list_verifier;
    let domain_hash = namehash("a.eth");

    let call = EnsRegistrar::registerDomainWithVerifierCall { owner, domainHash: domain_hash, verifier };
    let sent: CrossDomainMessenger::SentMessage =
        h.l1.send(owner, h.ens_registrar, &call).unwrap().event().unwrap();
    assert_eq!(sent.gas_limit(), 1_500_000);
    let payload = SuperChainTargetRegistrar::registerDomainWithVerifierCall::abi_decode(&sent.message)
        .unwrap();
    assert_eq!(payload.verifier, verifier);

    assert!(h.relay()[0].is_relayed());
    let record = h.l2.registry(h.protocol.sci_registry).unwrap().record(domain_hash);
    assert_eq!(record.verifier(), Some(verifier));
    assert_eq!(record.verifier_set_at(), record.registered_at());
}

#[test]
fn configured_gas_limits_are_used() {
    let limits = RelayGasLimits::new().with_register_domain(200_000);
    let mut h = TwoChainHarness::with_gas_limits(limits);
    let owner = h.deployer();

    let call = EnsRegistrar::registerDomainCall { owner, domainHash: namehash("a.eth") };
    let sent: CrossDomainMessenger::SentMessage =
        h.l1.send(owner, h.ens_registrar, &call).unwrap().event().unwrap();
    assert_eq!(sent.gas_limit(), 200_000);
}

#[test]
fn ens_gate_rejects_non_owners() {
    let mut h = TwoChainHarness::new();
    let owner = h.deployer();
    let stranger = h.accounts[1];

    // No ENS record at all.
    let unknown = namehash("b.eth");
    let err = h
        .l1
        .send(owner, h.ens_registrar, &EnsRegistrar::registerDomainCall { owner, domainHash: unknown })
        .unwrap_err();
    assert_eq!(err, ContractError::AccountIsNotEnsOwner { account: owner, domain_hash: unknown });

    // Claimed owner differs from the ENS owner.
    let domain_hash = namehash("a.eth");
    let err = h
        .l1
        .send(
            stranger,
            h.ens_registrar,
            &EnsRegistrar::registerDomainCall { owner: stranger, domainHash: domain_hash },
        )
        .unwrap_err();
    assert_eq!(err, ContractError::AccountIsNotEnsOwner { account: stranger, domain_hash });

    // The verifier variant also requires the caller to be the owner.
    let call = EnsRegistrar::registerDomainWithVerifierCall {
        owner,
        domainHash: domain_hash,
        verifier: h.protocol.public_list_verifier,
    };
    let err = h.l1.send(stranger, h.ens_registrar, &call).unwrap_err();
    assert_eq!(err, ContractError::AccountIsNotEnsOwner { account: stranger, domain_hash });

    assert!(h.l1.messenger(h.l1_messenger).unwrap().outbox().is_empty());
}

#[test]
fn transferred_ens_names_follow_the_new_owner() {
    let mut h = TwoChainHarness::new();
    let alice = h.accounts[2];
    let domain_hash = h.ens.assign(&mut h.l1, "alice.eth", alice);
    assert_eq!(h.ens.owner(&h.l1, "alice.eth"), alice);

    let call = EnsRegistrar::registerDomainCall { owner: alice, domainHash: domain_hash };
    h.l1.send(alice, h.ens_registrar, &call).unwrap();
    assert!(h.relay()[0].is_relayed());
    assert!(h.l2.registry(h.protocol.sci_registry).unwrap().is_owner(domain_hash, alice));
}

#[test]
fn target_registrar_only_accepts_the_messenger() {
    let mut h = TwoChainHarness::new();
    let deployer = h.deployer();
    let call = SuperChainTargetRegistrar::registerDomainCall {
        owner: deployer,
        domainHash: namehash("a.eth"),
    };
    let err = h.l2.send(deployer, h.target_registrar, &call).unwrap_err();
    assert_eq!(err, ContractError::InvalidMessageSender { sender: deployer });
}

#[test]
fn relays_from_unauthorized_senders_fail_until_granted() {
    let mut h = TwoChainHarness::new();
    let rogue = h.accounts[3];
    let domain_hash = namehash("a.eth");

    let payload = SuperChainTargetRegistrar::registerDomainCall { owner: rogue, domainHash: domain_hash };
    let send = CrossDomainMessenger::sendMessageCall {
        target: h.target_registrar,
        message: payload.abi_encode().into(),
        minGasLimit: 1_000_000,
    };
    h.l1.send(rogue, h.l1_messenger, &send).unwrap();

    let outcome = h.relay().remove(0);
    match &outcome.status {
        RelayStatus::Failed(err) => assert!(err.is_unauthorized(rogue, Role::RegisterDomain)),
        other => panic!("unexpected status {other:?}"),
    }
    assert!(h.l2.messenger(h.l2_messenger).unwrap().failure(outcome.id).is_some());
    assert!(h.l2.registry(h.protocol.sci_registry).unwrap().is_empty());

    // Grant and retry the same message.
    h.l2.transact(h.deployer(), h.target_registrar, grant_role_call(Role::RegisterDomain, rogue))
        .unwrap();
    let retry = h.bridge.relay(&mut h.l2, outcome.message.clone());
    assert!(retry.is_relayed());
    assert!(h.l2.registry(h.protocol.sci_registry).unwrap().is_owner(domain_hash, rogue));

    // Successful messages are never delivered twice.
    let replay = h.bridge.relay(&mut h.l2, outcome.message);
    assert_eq!(replay.status, RelayStatus::Rejected(ContractError::MessageAlreadyRelayed(outcome.id)));
}

#[test]
fn registrars_are_role_gated() {
    let mut h = TwoChainHarness::new();
    let deployer = h.deployer();
    let registrar = h.protocol.sci_registrar;
    let user = h.accounts[4];
    let domain_hash = namehash("example.com");

    let call = SciRegistrar::registerDomainCall { owner: user, domainHash: domain_hash };
    let err = h.l2.send(user, registrar, &call).unwrap_err();
    assert!(err.is_unauthorized(user, Role::RegisterDomain));

    h.l2.transact(deployer, registrar, grant_role_call(Role::RegisterDomain, user)).unwrap();
    h.l2.send(user, registrar, &call).unwrap();
    assert_eq!(h.l2.registry(h.protocol.sci_registry).unwrap().owner_of(domain_hash), user);

    // The registry itself only takes registrations from registrars.
    let direct = sci_bindings::SciRegistry::registerDomainCall { owner: user, domainHash: domain_hash };
    let err = h.l2.send(user, h.protocol.sci_registry, &direct).unwrap_err();
    assert!(err.is_unauthorized(user, Role::Registrar));
}

#[test]
fn relayer_is_the_only_first_deliverer() {
    let mut h = TwoChainHarness::new();
    let owner = h.deployer();
    let call = EnsRegistrar::registerDomainCall { owner, domainHash: namehash("a.eth") };
    h.l1.send(owner, h.ens_registrar, &call).unwrap();

    let message = h.l1.messenger(h.l1_messenger).unwrap().outbox()[0].clone();
    let stranger = Address::repeat_byte(0x77);
    let err = h.l2.send(stranger, h.l2_messenger, &message.relay_call()).unwrap_err();
    assert_eq!(err, ContractError::OnlyRelayer { caller: stranger });
}
