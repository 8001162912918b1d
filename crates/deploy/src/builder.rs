use crate::{DeployError, DeploymentState, DeploymentTarget, Parameters};
use alloy::primitives::{Address, Bytes};
use sci_constants::{DeploymentKey, RelayGasLimits, Role};
use sci_protocol::{grant_role_call, ContractSpec};
use std::{any::Any, collections::HashMap, fmt};
use tracing::{debug, info_span};

/// A deployment module: a function from parameters and the outputs of other
/// modules to contract and call futures.
///
/// Futures are identified by `<ID>#<name>`. A future already present in the
/// [`DeploymentState`] is not executed again.
pub trait Module {
    /// Module id, prefix of every future the module declares.
    const ID: &'static str;

    /// Addresses the module exposes to dependents.
    type Output: Clone + 'static;

    /// Declare the module's futures.
    fn build<T: DeploymentTarget>(m: &mut ModuleBuilder<'_, '_, T>) -> Result<Self::Output, DeployError>;
}

/// Futures touched by a deployment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentReport {
    /// Contracts deployed by this run.
    pub deployed: Vec<DeploymentKey>,
    /// Contracts found in the deployment state and reused.
    pub reused: Vec<DeploymentKey>,
    /// Calls executed by this run.
    pub executed: Vec<String>,
    /// Calls found in the journal and skipped.
    pub skipped: Vec<String>,
}

impl DeploymentReport {
    /// True if the run changed nothing on chain.
    pub fn is_noop(&self) -> bool {
        self.deployed.is_empty() && self.executed.is_empty()
    }
}

/// Runs modules against a [`DeploymentTarget`], recording every future in
/// the [`DeploymentState`].
pub struct Deployer<'a, T> {
    target: &'a mut T,
    accounts: Vec<Address>,
    parameters: Parameters,
    gas_limits: RelayGasLimits,
    state: DeploymentState,
    outputs: HashMap<&'static str, Box<dyn Any>>,
    report: DeploymentReport,
}

impl<T> fmt::Debug for Deployer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployer")
            .field("accounts", &self.accounts)
            .field("parameters", &self.parameters)
            .field("state", &self.state)
            .field("modules", &self.outputs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<'a, T: DeploymentTarget> Deployer<'a, T> {
    /// Create a deployer with an empty state. `accounts[0]` sends every
    /// transaction.
    pub fn new(target: &'a mut T, accounts: Vec<Address>) -> Self {
        let state = DeploymentState::new(target.chain_id());
        Self {
            target,
            accounts,
            parameters: Parameters::new(),
            gas_limits: RelayGasLimits::default(),
            state,
            outputs: HashMap::new(),
            report: DeploymentReport::default(),
        }
    }

    /// Resume from a previous state.
    pub fn with_state(mut self, state: DeploymentState) -> Self {
        self.state = state;
        self
    }

    /// Set module parameters.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the gas limits passed to ENS registrars.
    pub const fn with_gas_limits(mut self, gas_limits: RelayGasLimits) -> Self {
        self.gas_limits = gas_limits;
        self
    }

    /// The deployment state so far.
    pub const fn state(&self) -> &DeploymentState {
        &self.state
    }

    /// What this run did so far.
    pub const fn report(&self) -> &DeploymentReport {
        &self.report
    }

    /// Consume the deployer, returning the state and report.
    pub fn finish(self) -> (DeploymentState, DeploymentReport) {
        (self.state, self.report)
    }

    /// Run a module and its dependencies. Each module runs at most once per
    /// deployer.
    pub fn deploy<M: Module>(&mut self) -> Result<M::Output, DeployError> {
        if let Some(output) = self.outputs.get(M::ID).and_then(|o| o.downcast_ref::<M::Output>()) {
            return Ok(output.clone());
        }

        let _span = info_span!("module", id = M::ID).entered();
        debug!("building module");
        let output = M::build(&mut ModuleBuilder { deployer: self, module: M::ID })?;
        self.outputs.insert(M::ID, Box::new(output.clone()));
        Ok(output)
    }

    fn sender(&self) -> Result<Address, DeployError> {
        self.accounts.first().copied().ok_or(DeployError::MissingAccount(0))
    }
}

/// A deployed or reused contract future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFuture {
    /// The future id.
    pub key: DeploymentKey,
    /// Contract address.
    pub address: Address,
    /// Contracts created by the constructor. Empty when reused.
    pub derived: Vec<(&'static str, Address)>,
}

/// Handle passed to [`Module::build`].
pub struct ModuleBuilder<'d, 'a, T> {
    deployer: &'d mut Deployer<'a, T>,
    module: &'static str,
}

impl<T> fmt::Debug for ModuleBuilder<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleBuilder").field("module", &self.module).finish_non_exhaustive()
    }
}

impl<T: DeploymentTarget> ModuleBuilder<'_, '_, T> {
    /// Id of the module being built.
    pub const fn module(&self) -> &'static str {
        self.module
    }

    /// Chain id of the target.
    pub fn chain_id(&self) -> u64 {
        self.deployer.target.chain_id()
    }

    /// Gas limits configured for relayed registrations.
    pub const fn gas_limits(&self) -> RelayGasLimits {
        self.deployer.gas_limits
    }

    /// Deployer account at `index`.
    pub fn account(&self, index: usize) -> Result<Address, DeployError> {
        self.deployer.accounts.get(index).copied().ok_or(DeployError::MissingAccount(index))
    }

    /// Address parameter of this module.
    pub fn address_parameter(&self, name: &'static str) -> Result<Address, DeployError> {
        self.deployer.parameters.address(self.module, name)
    }

    /// Address parameter of this module, also accepted under `alias`.
    pub fn address_parameter_or(
        &self,
        name: &'static str,
        alias: &'static str,
    ) -> Result<Address, DeployError> {
        self.deployer.parameters.address_or(self.module, name, alias)
    }

    /// Run another module (once) and get its outputs.
    pub fn use_module<M: Module>(&mut self) -> Result<M::Output, DeployError> {
        self.deployer.deploy::<M>()
    }

    fn key(&self, name: &str) -> DeploymentKey {
        DeploymentKey::new(self.module, name)
    }

    fn recorded(&self, key: &DeploymentKey) -> Result<Option<Address>, DeployError> {
        match self.deployer.state.addresses().get(key) {
            Some(address) if self.deployer.target.has_code(address) => Ok(Some(address)),
            Some(address) => Err(DeployError::StaleAddress { key: key.clone(), address }),
            None => Ok(None),
        }
    }

    /// Deploy a contract, or reuse the one recorded under `<module>#<name>`.
    pub fn contract(
        &mut self,
        name: &str,
        spec: ContractSpec,
    ) -> Result<ContractFuture, DeployError> {
        let key = self.key(name);
        if let Some(address) = self.recorded(&key)? {
            debug!(%key, %address, "reusing contract");
            self.deployer.report.reused.push(key.clone());
            return Ok(ContractFuture { key, address, derived: Vec::new() });
        }

        let from = self.deployer.sender()?;
        let deployed = self
            .deployer
            .target
            .deploy_contract(from, spec)
            .map_err(|source| DeployError::Reverted { future: key.to_string(), source })?;
        debug!(%key, address = %deployed.address, "deployed contract");

        self.deployer.state.addresses_mut().insert(key.clone(), deployed.address);
        self.deployer.report.deployed.push(key.clone());
        Ok(ContractFuture { key, address: deployed.address, derived: deployed.derived })
    }

    /// Record an existing contract under `<module>#<name>`.
    pub fn contract_at(&mut self, name: &str, address: Address) -> Address {
        let key = self.key(name);
        if self.deployer.state.addresses_mut().insert(key.clone(), address).is_none() {
            debug!(%key, %address, "recorded contract");
        }
        address
    }

    /// Record a contract created by another future's constructor under
    /// `<module>#<name>`. A previously recorded address wins.
    pub fn derived(
        &mut self,
        name: &'static str,
        from: &ContractFuture,
    ) -> Result<Address, DeployError> {
        let key = self.key(name);
        if let Some(address) = self.recorded(&key)? {
            return Ok(address);
        }
        let address = from
            .derived
            .iter()
            .find_map(|(n, a)| (*n == name).then_some(*a))
            .ok_or_else(|| DeployError::MissingDerived { future: from.key.clone(), name })?;
        Ok(self.contract_at(name, address))
    }

    /// Send `data` to `to` from account 0, unless the call future
    /// `<module>#<id>` is already in the journal. Returns `true` if the call
    /// was executed.
    pub fn call(&mut self, id: &str, to: Address, data: Bytes) -> Result<bool, DeployError> {
        let future = self.key(id).to_string();
        if self.deployer.state.journal().contains(&future) {
            debug!(%future, "skipping executed call");
            self.deployer.report.skipped.push(future);
            return Ok(false);
        }

        let from = self.deployer.sender()?;
        self.deployer
            .target
            .send_transaction(from, to, data)
            .map_err(|source| DeployError::Reverted { future: future.clone(), source })?;
        debug!(%future, "executed call");

        self.deployer.state.journal_mut().record(future.clone());
        self.deployer.report.executed.push(future);
        Ok(true)
    }

    /// Grant `role` to `account` on `contract`, as call future
    /// `<module>#<contract_name>.grantRole.<ROLE>`.
    pub fn grant_role(
        &mut self,
        contract: &ContractFuture,
        role: Role,
        account: Address,
    ) -> Result<bool, DeployError> {
        let id = format!("{}.grantRole.{}", contract.key.contract(), role.name());
        self.call(&id, contract.address, grant_role_call(role, account))
    }

    /// Like [`Self::grant_role`], for a contract known only by address.
    pub fn grant_role_at(
        &mut self,
        contract_name: &str,
        contract: Address,
        role: Role,
        account: Address,
    ) -> Result<bool, DeployError> {
        let id = format!("{contract_name}.grantRole.{}", role.name());
        self.call(&id, contract, grant_role_call(role, account))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::{
        ProtocolModule, SciModule, SciRegistrarModule, SciRegistryModule, SciUpgradeModule,
    };
    use sci_protocol::Chain;

    const DEPLOYER: Address = Address::repeat_byte(0xd0);

    #[test]
    fn shared_modules_deploy_once() {
        let mut chain = Chain::new(10);
        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]);
        let protocol = deployer.deploy::<ProtocolModule>().unwrap();
        let (state, report) = deployer.finish();

        let registries =
            report.deployed.iter().filter(|k| **k == DeploymentKey::SCI_REGISTRY).count();
        assert_eq!(registries, 1);
        assert_eq!(state.addresses().get(&DeploymentKey::SCI_REGISTRY), Some(protocol.sci_registry));
        assert_eq!(state.addresses().get(&DeploymentKey::SCI), state.addresses().get(&DeploymentKey::SCI_PROXY));
        assert_eq!(state.addresses().get(&DeploymentKey::PROXY_ADMIN), Some(protocol.proxy_admin));
        assert!(report.reused.is_empty());
        // The registry chain needs no ENS parameters; the ENS registrar lives
        // on the satellite chain.
        assert_eq!(state.addresses().get(&DeploymentKey::ENS_REGISTRAR), None);
    }

    #[test]
    fn rerun_is_a_noop() {
        let mut chain = Chain::new(10);
        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]);
        let first = deployer.deploy::<ProtocolModule>().unwrap();
        let (state, _) = deployer.finish();
        let block = chain.block();

        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]).with_state(state.clone());
        let second = deployer.deploy::<ProtocolModule>().unwrap();
        let (after, report) = deployer.finish();

        assert_eq!(first, second);
        assert!(report.is_noop());
        assert_eq!(after, state);
        assert_eq!(chain.block(), block);
    }

    #[test]
    fn missing_grants_are_applied() {
        let mut chain = Chain::new(10);
        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]);
        let registry = deployer.deploy::<SciRegistryModule>().unwrap().sci_registry;
        let (state, _) = deployer.finish();

        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]).with_state(state);
        let out = deployer.deploy::<SciRegistrarModule>().unwrap();
        let (_, report) = deployer.finish();

        assert_eq!(out.sci_registry, registry);
        assert_eq!(report.reused, vec![DeploymentKey::SCI_REGISTRY]);
        assert_eq!(
            report.executed,
            vec![
                "SciRegstrar#SciRegistry.grantRole.REGISTRAR_ROLE".to_string(),
                "SciRegstrar#SciRegistrar.grantRole.REGISTER_DOMAIN_ROLE".to_string(),
            ]
        );
        assert_eq!(report.skipped, vec!["SciRegistry#SciRegistry.grantRole.REGISTRAR_MANAGER_ROLE".to_string()]);
        assert!(chain.access(registry).unwrap().has_role(Role::Registrar, out.sci_registrar));
        assert!(chain.access(out.sci_registrar).unwrap().has_role(Role::RegisterDomain, DEPLOYER));
    }

    #[test]
    fn stale_state_is_reported() {
        let mut chain = Chain::new(10);
        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]);
        deployer.deploy::<SciRegistryModule>().unwrap();
        let (state, _) = deployer.finish();

        let mut fresh = Chain::new(10);
        let mut deployer = Deployer::new(&mut fresh, vec![DEPLOYER]).with_state(state);
        let err = deployer.deploy::<SciRegistryModule>().unwrap_err();
        assert!(matches!(err, DeployError::StaleAddress { .. }));
    }

    #[test]
    fn upgrade_keeps_proxy() {
        let mut chain = Chain::new(10);
        let mut deployer = Deployer::new(&mut chain, vec![DEPLOYER]);
        let before = deployer.deploy::<SciModule>().unwrap();
        let after = deployer.deploy::<SciUpgradeModule>().unwrap();
        let (state, _) = deployer.finish();

        assert_eq!(before, after);
        let upgraded = state.addresses().get(&DeploymentKey::new("UpgradeModule", "SCI")).unwrap();
        assert_ne!(Some(upgraded), state.addresses().get(&DeploymentKey::SCI_IMPLEMENTATION));
        assert_eq!(chain.proxy(before.proxy).unwrap().implementation(), upgraded);
        assert_eq!(chain.sci_storage(before.sci).unwrap().owner(), DEPLOYER);
    }

    #[test]
    fn no_accounts_is_an_error() {
        let mut chain = Chain::new(10);
        let mut deployer = Deployer::new(&mut chain, vec![]);
        assert!(matches!(deployer.deploy::<SciRegistryModule>(), Err(DeployError::MissingAccount(0))));
    }
}
