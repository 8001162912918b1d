use crate::{
    ens::EnsFixture,
    users::{test_accounts, DEPLOYER, RELAYER},
};
use alloy::primitives::Address;
use sci_constants::{optimism, sepolia, RelayGasLimits};
use sci_deploy::{
    modules::{
        CleanupModule, ProtocolModule, ProtocolOutput, SatelliteModule,
        SuperChainTargetRegistrarModule,
    },
    Deployer, DeploymentState, Parameters,
};
use sci_protocol::{Bridge, Chain, ContractSpec, RelayOutcome};

/// An L1 holding ENS and the `EnsRegistrar`, and an L2 holding the registry,
/// connected by a messenger pair and a bridge.
///
/// Deployed with the same modules and parameters as a live deployment:
/// `ProtocolModule` and `SuperChainTargetRegistrarModule` on L2,
/// `SateliteModule` on L1, then `CleanupModule` on L2.
#[derive(Debug, Clone)]
pub struct TwoChainHarness {
    /// The chain ENS lives on.
    pub l1: Chain,
    /// The chain the registry lives on.
    pub l2: Chain,
    /// Deterministic accounts; account 0 deployed everything.
    pub accounts: Vec<Address>,
    /// ENS on L1.
    pub ens: EnsFixture,
    /// Messenger on L1.
    pub l1_messenger: Address,
    /// Messenger on L2.
    pub l2_messenger: Address,
    /// Relayer between the two messengers.
    pub bridge: Bridge,
    /// The ENS registrar on L1.
    pub ens_registrar: Address,
    /// The target registrar on L2.
    pub target_registrar: Address,
    /// Registry-side contracts on L2.
    pub protocol: ProtocolOutput,
    /// Deployment state of L1.
    pub l1_state: DeploymentState,
    /// Deployment state of L2.
    pub l2_state: DeploymentState,
}

impl TwoChainHarness {
    /// Deploy with the default relay gas limits.
    pub fn new() -> Self {
        Self::with_gas_limits(RelayGasLimits::default())
    }

    /// Deploy with custom relay gas limits on the ENS registrar.
    pub fn with_gas_limits(gas_limits: RelayGasLimits) -> Self {
        let accounts = test_accounts();
        let deployer = accounts[DEPLOYER];
        let relayer = accounts[RELAYER];

        let mut l1 = Chain::new(sepolia::CHAIN_ID);
        let mut l2 = Chain::new(optimism::CHAIN_ID);

        let ens = EnsFixture::setup(&mut l1, deployer);
        let l1_messenger =
            l1.deploy(deployer, ContractSpec::Messenger { relayer }).unwrap().address;
        let l2_messenger =
            l2.deploy(deployer, ContractSpec::Messenger { relayer }).unwrap().address;

        // L2: registry side.
        let parameters = Parameters::new().with_address(
            "SuperChainTargetRegistrar",
            "l2CrossDomainMessengerAddress",
            l2_messenger,
        );
        let mut deployer_l2 =
            Deployer::new(&mut l2, accounts.clone()).with_parameters(parameters.clone());
        let protocol = deployer_l2.deploy::<ProtocolModule>().unwrap();
        let target_registrar = deployer_l2
            .deploy::<SuperChainTargetRegistrarModule>()
            .unwrap()
            .super_chain_target_registrar;
        let (l2_state, _) = deployer_l2.finish();

        // L1: ENS registrar addressing the target registrar.
        let parameters_l1 = Parameters::new()
            .with_address("EnsRegistrar", "ensRegistryAddress", ens.ens)
            .with_address("EnsRegistrar", "l1CrossDomainMessengerAddress", l1_messenger)
            .with_address("EnsRegistrar", "targetRegistrarAddress", target_registrar);
        let mut deployer_l1 = Deployer::new(&mut l1, accounts.clone())
            .with_parameters(parameters_l1)
            .with_gas_limits(gas_limits);
        let ens_registrar = deployer_l1.deploy::<SatelliteModule>().unwrap().ens_registrar;
        let (l1_state, _) = deployer_l1.finish();

        // L2: let the ENS registrar register through the target registrar.
        let parameters =
            parameters.with_address("CleanupModule", "ensRegistrarAddress", ens_registrar);
        let mut deployer_l2 = Deployer::new(&mut l2, accounts.clone())
            .with_parameters(parameters)
            .with_state(l2_state);
        deployer_l2.deploy::<CleanupModule>().unwrap();
        let (l2_state, _) = deployer_l2.finish();

        Self {
            l1,
            l2,
            accounts,
            ens,
            l1_messenger,
            l2_messenger,
            bridge: Bridge::new(relayer, l1_messenger, l2_messenger),
            ens_registrar,
            target_registrar,
            protocol,
            l1_state,
            l2_state,
        }
    }

    /// The deploying account, which owns `eth` and `a.eth` on ENS and holds
    /// every admin role.
    pub fn deployer(&self) -> Address {
        self.accounts[DEPLOYER]
    }

    /// Relay every message waiting in the L1 outbox to L2.
    pub fn relay(&mut self) -> Vec<RelayOutcome> {
        self.bridge.relay_pending(&mut self.l1, &mut self.l2).unwrap()
    }
}

impl Default for TwoChainHarness {
    fn default() -> Self {
        Self::new()
    }
}
