use crate::{
    access::{self, AccessControl},
    ens::{self, EnsRegistrar, EnsRegistry},
    messenger::{self, Messenger},
    proxy::{self, ProxyAdmin, TransparentProxy},
    registrar::{self, SciRegistrar},
    registry::{self, Registry},
    sci::{self, Sci, SciStorage},
    target::{self, TargetRegistrar},
    verifier::{self, PublicListVerifier},
    ContractError, Result,
};
use alloy::{
    primitives::{Address, Bytes, Log},
    sol_types::{SolCall, SolEvent},
};
use sci_constants::RelayGasLimits;
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

/// Seconds between consecutive blocks.
pub const BLOCK_TIME: u64 = 12;

/// Timestamp of the genesis block of a fresh [`Chain`].
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

/// Block environment of the transaction being executed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockEnv {
    /// Block number.
    pub number: u64,
    /// Block timestamp, in seconds.
    pub timestamp: u64,
}

/// Caller and callee of the current call frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// `msg.sender` of the frame.
    pub caller: Address,
    /// Address of the executing contract.
    pub address: Address,
}

/// A contract deployed on a [`Chain`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Contract {
    /// `SciRegistry`.
    Registry(Registry),
    /// `SciRegistrar`.
    SciRegistrar(SciRegistrar),
    /// ENS node-ownership registry.
    EnsRegistry(EnsRegistry),
    /// `EnsRegistrar`.
    EnsRegistrar(EnsRegistrar),
    /// `SuperChainTargetRegistrar`.
    TargetRegistrar(TargetRegistrar),
    /// Cross-domain messenger.
    Messenger(Messenger),
    /// `PublicListVerifier`.
    Verifier(PublicListVerifier),
    /// `SCI` implementation.
    Sci(Sci),
    /// `TransparentUpgradeableProxy`.
    Proxy(TransparentProxy),
    /// `ProxyAdmin`.
    ProxyAdmin(ProxyAdmin),
}

type Executor = fn(&mut Chain, CallContext, &[u8]) -> Result<Bytes>;

impl Contract {
    /// Name of the contract, as used in deployment manifests.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Registry(_) => "SciRegistry",
            Self::SciRegistrar(_) => "SciRegistrar",
            Self::EnsRegistry(_) => "ENSRegistry",
            Self::EnsRegistrar(_) => "EnsRegistrar",
            Self::TargetRegistrar(_) => "SuperChainTargetRegistrar",
            Self::Messenger(_) => "CrossDomainMessenger",
            Self::Verifier(_) => "PublicListVerifier",
            Self::Sci(_) => "SCI",
            Self::Proxy(_) => "TransparentUpgradeableProxy",
            Self::ProxyAdmin(_) => "ProxyAdmin",
        }
    }

    /// The role table, for access-controlled contracts.
    pub fn access(&self) -> Option<&AccessControl> {
        match self {
            Self::Registry(c) => Some(c.access()),
            Self::SciRegistrar(c) => Some(c.access()),
            Self::TargetRegistrar(c) => Some(c.access()),
            _ => None,
        }
    }

    fn access_mut(&mut self) -> Option<&mut AccessControl> {
        match self {
            Self::Registry(c) => Some(c.access_mut()),
            Self::SciRegistrar(c) => Some(c.access_mut()),
            Self::TargetRegistrar(c) => Some(c.access_mut()),
            _ => None,
        }
    }

    fn executor(&self) -> Executor {
        match self {
            Self::Registry(_) => registry::execute,
            Self::SciRegistrar(_) => registrar::execute,
            Self::EnsRegistry(_) => ens::execute_registry,
            Self::EnsRegistrar(_) => ens::execute_registrar,
            Self::TargetRegistrar(_) => target::execute,
            Self::Messenger(_) => messenger::execute,
            Self::Verifier(_) => verifier::execute,
            Self::Sci(_) => sci::execute,
            Self::Proxy(_) => proxy::execute_proxy,
            Self::ProxyAdmin(_) => proxy::execute_admin,
        }
    }
}

/// Constructor arguments of a deployable contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractSpec {
    /// `SciRegistry(defaultAdminDelay)`.
    Registry {
        /// Delay of default admin transfers.
        default_admin_delay: u64,
    },
    /// `SciRegistrar(registry, defaultAdminDelay)`.
    SciRegistrar {
        /// The registry to forward to.
        registry: Address,
        /// Delay of default admin transfers.
        default_admin_delay: u64,
    },
    /// ENS registry. The deployer owns the root node.
    EnsRegistry,
    /// `EnsRegistrar(ensRegistry, messenger, targetRegistrar)`.
    EnsRegistrar {
        /// ENS registry used as the ownership oracle.
        ens: Address,
        /// Origin-side cross-domain messenger.
        messenger: Address,
        /// Destination-side registrar messages are addressed to.
        target: Address,
        /// Gas limits attached to relayed calls.
        gas_limits: RelayGasLimits,
    },
    /// `SuperChainTargetRegistrar(registry, messenger, defaultAdminDelay)`.
    TargetRegistrar {
        /// The registry to forward to.
        registry: Address,
        /// Destination-side cross-domain messenger.
        messenger: Address,
        /// Delay of default admin transfers.
        default_admin_delay: u64,
    },
    /// Cross-domain messenger, relaying new messages only from `relayer`.
    Messenger {
        /// The bridge account allowed to relay new messages.
        relayer: Address,
    },
    /// `PublicListVerifier(registry)`.
    PublicListVerifier {
        /// Registry consulted for domain ownership.
        registry: Address,
    },
    /// `SCI` implementation, initializers disabled.
    Sci,
    /// `TransparentUpgradeableProxy(logic, initialOwner, data)`. Creates its
    /// own `ProxyAdmin` owned by `initial_owner`.
    TransparentProxy {
        /// Initial implementation.
        logic: Address,
        /// Owner of the created `ProxyAdmin`.
        initial_owner: Address,
        /// Initializer calldata delegated to `logic`, may be empty.
        data: Bytes,
    },
}

impl ContractSpec {
    /// Name of the deployed contract.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Registry { .. } => "SciRegistry",
            Self::SciRegistrar { .. } => "SciRegistrar",
            Self::EnsRegistry => "ENSRegistry",
            Self::EnsRegistrar { .. } => "EnsRegistrar",
            Self::TargetRegistrar { .. } => "SuperChainTargetRegistrar",
            Self::Messenger { .. } => "CrossDomainMessenger",
            Self::PublicListVerifier { .. } => "PublicListVerifier",
            Self::Sci => "SCI",
            Self::TransparentProxy { .. } => "TransparentUpgradeableProxy",
        }
    }
}

/// Result of a contract deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployed {
    /// Address of the deployed contract.
    pub address: Address,
    /// Contracts created by the constructor, by name.
    pub derived: Vec<(&'static str, Address)>,
    /// Logs emitted by the constructor.
    pub logs: Vec<Log>,
}

impl Deployed {
    /// Address of a contract created by the constructor.
    pub fn derived(&self, name: &str) -> Option<Address> {
        self.derived.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
    }
}

/// A call in a batch transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The callee.
    pub to: Address,
    /// Calldata.
    pub data: Bytes,
}

impl Call {
    /// Create a call from a typed function call.
    pub fn new<C: SolCall>(to: Address, call: &C) -> Self {
        Self { to, data: call.abi_encode().into() }
    }
}

/// Outcome of a successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Block the transaction was included in.
    pub block: BlockEnv,
    /// Return data of the (last) call.
    pub output: Bytes,
    /// Logs emitted by the transaction.
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Decode all logs of event type `E`.
    pub fn events<E: SolEvent>(&self) -> impl Iterator<Item = E> + '_ {
        self.logs.iter().filter_map(|log| E::decode_log_data(&log.data).ok())
    }

    /// Decode the first log of event type `E`, if any.
    pub fn event<E: SolEvent>(&self) -> Option<E> {
        self.events().next()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ChainState {
    contracts: BTreeMap<Address, Contract>,
    nonces: BTreeMap<Address, u64>,
    logs: Vec<Log>,
}

/// A single chain: its contracts, account nonces and event log.
///
/// Every transaction is mined in its own block, so the timestamp observed by
/// contracts strictly increases between transactions. A call frame that
/// fails leaves no trace: contract storage, nonces of created contracts and
/// logs are restored to their state at frame entry.
#[derive(Debug, Clone)]
pub struct Chain {
    chain_id: u64,
    block: BlockEnv,
    state: ChainState,
}

impl Chain {
    /// Create an empty chain at genesis.
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            block: BlockEnv { number: 0, timestamp: GENESIS_TIMESTAMP },
            state: Default::default(),
        }
    }

    /// The chain id.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The current block.
    pub const fn block(&self) -> BlockEnv {
        self.block
    }

    /// Timestamp of the current block.
    pub const fn timestamp(&self) -> u64 {
        self.block.timestamp
    }

    /// Transaction count of `account`.
    pub fn nonce(&self, account: Address) -> u64 {
        self.state.nonces.get(&account).copied().unwrap_or_default()
    }

    /// All logs emitted on this chain, oldest first.
    pub fn logs(&self) -> &[Log] {
        &self.state.logs
    }

    /// Get the contract at `address`.
    pub fn contract(&self, address: Address) -> Option<&Contract> {
        self.state.contracts.get(&address)
    }

    /// True if a contract lives at `address`.
    pub fn has_code(&self, address: Address) -> bool {
        self.state.contracts.contains_key(&address)
    }

    /// Role table of the access-controlled contract at `address`.
    pub fn access(&self, address: Address) -> Result<&AccessControl> {
        self.contract(address)
            .and_then(Contract::access)
            .ok_or(ContractError::NoContract { address, expected: "access-controlled" })
    }

    pub(crate) fn access_mut(&mut self, address: Address) -> Result<&mut AccessControl> {
        self.state
            .contracts
            .get_mut(&address)
            .and_then(Contract::access_mut)
            .ok_or(ContractError::NoContract { address, expected: "access-controlled" })
    }

    /// SCI storage at `address`, either a proxy or an implementation.
    pub fn sci_storage(&self, address: Address) -> Result<&SciStorage> {
        match self.contract(address) {
            Some(Contract::Sci(sci)) => Ok(sci.storage()),
            Some(Contract::Proxy(proxy)) => Ok(proxy.storage()),
            _ => Err(ContractError::NoContract { address, expected: "SCI" }),
        }
    }

    pub(crate) fn sci_storage_mut(&mut self, address: Address) -> Result<&mut SciStorage> {
        match self.state.contracts.get_mut(&address) {
            Some(Contract::Sci(sci)) => Ok(sci.storage_mut()),
            Some(Contract::Proxy(proxy)) => Ok(proxy.storage_mut()),
            _ => Err(ContractError::NoContract { address, expected: "SCI" }),
        }
    }

    pub(crate) fn emit<E: SolEvent>(&mut self, address: Address, event: &E) {
        trace!(%address, event = E::SIGNATURE, "emit");
        self.state.logs.push(Log { address, data: event.encode_log_data() });
    }

    fn mine(&mut self) {
        self.block.number += 1;
        self.block.timestamp += BLOCK_TIME;
    }

    fn bump_nonce(&mut self, account: Address) -> u64 {
        let nonce = self.state.nonces.entry(account).or_default();
        let current = *nonce;
        *nonce += 1;
        current
    }

    /// Advance the chain by `blocks` empty blocks.
    pub fn advance(&mut self, blocks: u64) {
        for _ in 0..blocks {
            self.mine();
        }
    }

    /// Execute a call frame. On error, all state changes made by the frame
    /// are discarded.
    pub(crate) fn call(&mut self, caller: Address, to: Address, input: &[u8]) -> Result<Bytes> {
        let Some(contract) = self.state.contracts.get(&to) else {
            return Err(ContractError::NoContract { address: to, expected: "any" });
        };
        let exec = contract.executor();
        trace!(%caller, %to, contract = contract.name(), "call");

        let snapshot = self.state.clone();
        let res = exec(self, CallContext { caller, address: to }, input);
        if res.is_err() {
            self.state = snapshot;
        }
        res
    }

    /// Run a call without committing any state change.
    pub fn view(&self, caller: Address, to: Address, input: &[u8]) -> Result<Bytes> {
        let mut scratch = self.clone();
        scratch.call(caller, to, input)
    }

    /// Run a typed read-only call.
    pub fn view_call<C: SolCall>(&self, to: Address, call: &C) -> Result<Bytes> {
        self.view(Address::ZERO, to, &call.abi_encode())
    }

    /// Mine a transaction from `from` calling `to` with `input`.
    #[instrument(skip_all, fields(chain_id = self.chain_id, %from, %to))]
    pub fn transact(&mut self, from: Address, to: Address, input: Bytes) -> Result<Receipt> {
        self.transact_batch(from, &[Call { to, data: input }])
    }

    /// Mine a transaction from `from` executing a typed call.
    pub fn send<C: SolCall>(&mut self, from: Address, to: Address, call: &C) -> Result<Receipt> {
        self.transact(from, to, call.abi_encode().into())
    }

    /// Mine a single transaction from `from` executing every call in order.
    /// Either all calls succeed or none of their effects are kept.
    pub fn transact_batch(&mut self, from: Address, calls: &[Call]) -> Result<Receipt> {
        self.mine();
        self.bump_nonce(from);
        let snapshot = self.state.clone();
        let first_log = self.state.logs.len();

        let mut output = Bytes::new();
        for call in calls {
            match self.call(from, call.to, &call.data) {
                Ok(out) => output = out,
                Err(err) => {
                    debug!(%from, to = %call.to, %err, "transaction reverted");
                    self.state = snapshot;
                    return Err(err);
                }
            }
        }

        let logs = self.state.logs[first_log..].to_vec();
        Ok(Receipt { block: self.block, output, logs })
    }

    /// Mine a transaction deploying a contract from `from`. The address is
    /// derived from the sender and its nonce.
    #[instrument(skip_all, fields(chain_id = self.chain_id, %from, contract = spec.name()))]
    pub fn deploy(&mut self, from: Address, spec: ContractSpec) -> Result<Deployed> {
        self.mine();
        let address = from.create(self.bump_nonce(from));
        let snapshot = self.state.clone();
        let first_log = self.state.logs.len();

        match self.construct(from, address, spec) {
            Ok(derived) => {
                debug!(%address, "contract deployed");
                let logs = self.state.logs[first_log..].to_vec();
                Ok(Deployed { address, derived, logs })
            }
            Err(err) => {
                self.state = snapshot;
                Err(err)
            }
        }
    }

    fn construct(
        &mut self,
        deployer: Address,
        address: Address,
        spec: ContractSpec,
    ) -> Result<Vec<(&'static str, Address)>> {
        // Contract accounts start at nonce 1.
        self.state.nonces.insert(address, 1);

        let contract = match spec {
            ContractSpec::Registry { default_admin_delay } => {
                Contract::Registry(Registry::new(deployer, default_admin_delay))
            }
            ContractSpec::SciRegistrar { registry, default_admin_delay } => {
                Contract::SciRegistrar(SciRegistrar::new(registry, deployer, default_admin_delay))
            }
            ContractSpec::EnsRegistry => Contract::EnsRegistry(EnsRegistry::new(deployer)),
            ContractSpec::EnsRegistrar { ens, messenger, target, gas_limits } => {
                Contract::EnsRegistrar(EnsRegistrar::new(ens, messenger, target, gas_limits))
            }
            ContractSpec::TargetRegistrar { registry, messenger, default_admin_delay } => {
                Contract::TargetRegistrar(TargetRegistrar::new(
                    registry,
                    messenger,
                    deployer,
                    default_admin_delay,
                ))
            }
            ContractSpec::Messenger { relayer } => Contract::Messenger(Messenger::new(relayer)),
            ContractSpec::PublicListVerifier { registry } => {
                Contract::Verifier(PublicListVerifier::new(registry))
            }
            ContractSpec::Sci => Contract::Sci(Sci::new()),
            ContractSpec::TransparentProxy { logic, initial_owner, data } => {
                let ctx = CallContext { caller: deployer, address };
                return proxy::construct(self, ctx, logic, initial_owner, &data);
            }
        };
        self.state.contracts.insert(address, contract);
        Ok(Vec::new())
    }

    /// Create a contract at `address` from a constructor. Used by contracts
    /// whose constructor creates other contracts.
    pub(crate) fn create(&mut self, creator: Address, contract: Contract) -> Address {
        let address = creator.create(self.bump_nonce(creator));
        self.state.nonces.insert(address, 1);
        self.state.contracts.insert(address, contract);
        address
    }

    pub(crate) fn insert(&mut self, address: Address, contract: Contract) {
        self.state.contracts.insert(address, contract);
    }
}

macro_rules! typed_contracts {
    ($($variant:ident => $ty:ty, $get:ident, $get_mut:ident;)*) => {
        impl Chain {
            $(
                #[doc = concat!("Get the `", stringify!($ty), "` at `address`.")]
                pub fn $get(&self, address: Address) -> Result<&$ty> {
                    match self.state.contracts.get(&address) {
                        Some(Contract::$variant(c)) => Ok(c),
                        _ => Err(ContractError::NoContract {
                            address,
                            expected: stringify!($ty),
                        }),
                    }
                }

                #[allow(dead_code)]
                pub(crate) fn $get_mut(&mut self, address: Address) -> Result<&mut $ty> {
                    match self.state.contracts.get_mut(&address) {
                        Some(Contract::$variant(c)) => Ok(c),
                        _ => Err(ContractError::NoContract {
                            address,
                            expected: stringify!($ty),
                        }),
                    }
                }
            )*
        }
    };
}

typed_contracts! {
    Registry => Registry, registry, registry_mut;
    SciRegistrar => SciRegistrar, sci_registrar, sci_registrar_mut;
    EnsRegistry => EnsRegistry, ens_registry, ens_registry_mut;
    EnsRegistrar => EnsRegistrar, ens_registrar, ens_registrar_mut;
    TargetRegistrar => TargetRegistrar, target_registrar, target_registrar_mut;
    Messenger => Messenger, messenger, messenger_mut;
    Verifier => PublicListVerifier, verifier, verifier_mut;
    Proxy => TransparentProxy, proxy, proxy_mut;
    ProxyAdmin => ProxyAdmin, proxy_admin, proxy_admin_mut;
}

/// Run the shared role-table functions for an access-controlled contract,
/// or fail with [`ContractError::UnknownSelector`].
pub(crate) fn fallback(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    access::execute(chain, ctx, input).unwrap_or_else(|| Err(unknown_selector(ctx, input)))
}

pub(crate) fn unknown_selector(ctx: CallContext, input: &[u8]) -> ContractError {
    ContractError::UnknownSelector {
        address: ctx.address,
        selector: Bytes::copy_from_slice(&input[..input.len().min(4)]),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloy::sol_types::SolValue;
    use sci_bindings::{IAccessControl, SciRegistry};
    use sci_constants::Role;

    const ADMIN: Address = Address::repeat_byte(0xaa);

    #[test]
    fn each_transaction_mines_a_block() {
        let mut chain = Chain::new(1);
        let before = chain.block();
        let deployed = chain.deploy(ADMIN, ContractSpec::Registry { default_admin_delay: 0 }).unwrap();
        assert_eq!(chain.block().number, before.number + 1);
        assert_eq!(chain.timestamp(), before.timestamp + BLOCK_TIME);
        assert_eq!(deployed.address, ADMIN.create(0));
        assert_eq!(chain.nonce(ADMIN), 1);
    }

    #[test]
    fn reverted_transaction_keeps_no_logs() {
        let mut chain = Chain::new(1);
        let registry =
            chain.deploy(ADMIN, ContractSpec::Registry { default_admin_delay: 0 }).unwrap().address;
        let logs = chain.logs().len();

        let calls = [
            Call::new(
                registry,
                &IAccessControl::grantRoleCall { role: Role::Registrar.id(), account: ADMIN },
            ),
            Call::new(
                registry,
                &SciRegistry::registerDomainCall { owner: Address::ZERO, domainHash: Default::default() },
            ),
        ];
        let err = chain.transact_batch(ADMIN, &calls).unwrap_err();
        assert!(matches!(err, ContractError::InvalidDomainOwner { .. }));
        assert_eq!(chain.logs().len(), logs);
        assert!(!chain.access(registry).unwrap().has_role(Role::Registrar, ADMIN));
    }

    #[test]
    fn views_do_not_commit() {
        let mut chain = Chain::new(1);
        let registry =
            chain.deploy(ADMIN, ContractSpec::Registry { default_admin_delay: 0 }).unwrap().address;
        let out = chain
            .view_call(registry, &IAccessControl::hasRoleCall { role: Role::DefaultAdmin.id(), account: ADMIN })
            .unwrap();
        assert!(bool::abi_decode(&out).unwrap());
        assert_eq!(chain.block().number, 1);
    }

    #[test]
    fn calling_an_empty_account_fails() {
        let mut chain = Chain::new(1);
        let err = chain.transact(ADMIN, Address::ZERO, Bytes::new()).unwrap_err();
        assert!(matches!(err, ContractError::NoContract { .. }));
    }
}
