use sci_constants::{localhost, optimism, sepolia, DeploymentKey};
use sci_deploy::{
    modules::{ProtocolModule, SciUpgradeModule, SuperChainTargetRegistrarModule},
    AggregatedManifest, Deployer, DeploymentState, Parameters,
};
use sci_protocol::Chain;
use sci_test_utils::{test_accounts, TwoChainHarness};

#[test]
fn manifest_aggregates_saved_deployments() {
    let h = TwoChainHarness::new();
    let dir = tempfile::tempdir().unwrap();
    h.l1_state.save(dir.path()).unwrap();
    h.l2_state.save(dir.path()).unwrap();

    // A local deployment is written but never aggregated.
    let mut local = Chain::new(localhost::CHAIN_ID);
    let mut deployer = Deployer::new(&mut local, test_accounts());
    deployer.deploy::<ProtocolModule>().unwrap();
    deployer.state().save(dir.path()).unwrap();

    let manifest = AggregatedManifest::build(dir.path(), &[localhost::CHAIN_ID]).unwrap();
    assert_eq!(manifest.chain_ids().collect::<Vec<_>>(), vec![optimism::CHAIN_ID, sepolia::CHAIN_ID]);
    assert_eq!(
        manifest.address(optimism::CHAIN_ID, &DeploymentKey::SCI_REGISTRY),
        Some(h.protocol.sci_registry)
    );
    assert_eq!(manifest.address(optimism::CHAIN_ID, &DeploymentKey::SCI), Some(h.protocol.sci));
    assert_eq!(
        manifest.address(optimism::CHAIN_ID, &DeploymentKey::SUPER_CHAIN_TARGET_REGISTRAR),
        Some(h.target_registrar)
    );
    assert_eq!(
        manifest.address(sepolia::CHAIN_ID, &DeploymentKey::ENS_REGISTRAR),
        Some(h.ens_registrar)
    );
    for (key, address) in h.l2_state.addresses().iter() {
        assert_eq!(manifest.address(optimism::CHAIN_ID, key), Some(*address));
    }

    // The published deployment view covers every published key.
    let deployment = manifest.chain(optimism::CHAIN_ID).unwrap().to_deployment(optimism::CHAIN_ID);
    assert!(deployment.is_none(), "L2 has no ENS registrar");

    let out = dir.path().join("deployments.json");
    manifest.save(&out).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(raw.get("10").is_some());
    assert!(raw.get("31337").is_none());
    assert_eq!(AggregatedManifest::load(&out).unwrap(), manifest);
}

#[test]
fn redeploying_from_disk_is_a_noop() {
    let mut h = TwoChainHarness::new();
    let dir = tempfile::tempdir().unwrap();
    h.l2_state.save(dir.path()).unwrap();

    let state = DeploymentState::load(dir.path(), optimism::CHAIN_ID).unwrap();
    assert_eq!(state, h.l2_state);

    // Parameter files written for the published deployments use this spelling.
    let parameters = Parameters::new().with_address(
        "SuperChainTargetRegistrar",
        "l2CrossDomainMessangerAddress",
        h.l2_messenger,
    );
    let block = h.l2.block();
    let mut deployer = Deployer::new(&mut h.l2, h.accounts.clone())
        .with_state(state)
        .with_parameters(parameters);
    let protocol = deployer.deploy::<ProtocolModule>().unwrap();
    deployer.deploy::<SuperChainTargetRegistrarModule>().unwrap();
    let (_, report) = deployer.finish();

    assert_eq!(protocol, h.protocol);
    assert!(report.is_noop(), "{report:?}");
    assert_eq!(h.l2.block(), block);
}

#[test]
fn upgrade_after_deployment_keeps_sci() {
    let mut h = TwoChainHarness::new();
    let before = *h.l2.sci_storage(h.protocol.sci).unwrap();

    let mut deployer =
        Deployer::new(&mut h.l2, h.accounts.clone()).with_state(h.l2_state.clone());
    let upgraded = deployer.deploy::<SciUpgradeModule>().unwrap();
    let (state, report) = deployer.finish();

    assert_eq!(upgraded.sci, h.protocol.sci);
    assert_eq!(report.executed, vec!["UpgradeModule#ProxyAdmin.upgradeAndCall".to_owned()]);
    let implementation = state.addresses().get(&DeploymentKey::new("UpgradeModule", "SCI")).unwrap();
    assert_eq!(h.l2.proxy(h.protocol.sci).unwrap().implementation(), implementation);
    assert_eq!(*h.l2.sci_storage(h.protocol.sci).unwrap(), before);
}
