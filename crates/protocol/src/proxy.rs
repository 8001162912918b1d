use crate::{
    chain::unknown_selector, sci, CallContext, Chain, Contract, ContractError, Result,
    SciStorage,
};
use alloy::{
    primitives::{Address, Bytes},
    sol_types::{SolCall, SolInterface, SolValue},
};
use sci_bindings::{
    IOwnable::{self, IOwnableCalls},
    ProxyAdmin::ProxyAdminCalls,
    TransparentUpgradeableProxy::{self as Abi, TransparentUpgradeableProxyCalls},
};
use tracing::debug;

/// A transparent upgradeable proxy in front of an `SCI` implementation.
///
/// Holds the facade storage. Every account except the admin is delegated to
/// the implementation; the admin may only upgrade.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransparentProxy {
    implementation: Address,
    admin: Address,
    storage: SciStorage,
}

impl TransparentProxy {
    /// The current implementation.
    pub const fn implementation(&self) -> Address {
        self.implementation
    }

    /// The `ProxyAdmin` created with the proxy.
    pub const fn admin(&self) -> Address {
        self.admin
    }

    pub(crate) const fn storage(&self) -> &SciStorage {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut SciStorage {
        &mut self.storage
    }
}

/// Owner-gated admin of a [`TransparentProxy`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProxyAdmin {
    owner: Address,
}

impl ProxyAdmin {
    /// Owner allowed to upgrade.
    pub const fn owner(&self) -> Address {
        self.owner
    }
}

fn ensure_implementation(chain: &Chain, address: Address) -> Result<()> {
    match chain.contract(address) {
        Some(Contract::Sci(_)) => Ok(()),
        _ => Err(ContractError::NoContract { address, expected: "SCI implementation" }),
    }
}

/// Constructor of the proxy: creates the admin, points at `logic` and runs
/// the initializer. Returns the derived `ProxyAdmin` address.
pub(crate) fn construct(
    chain: &mut Chain,
    ctx: CallContext,
    logic: Address,
    initial_owner: Address,
    data: &[u8],
) -> Result<Vec<(&'static str, Address)>> {
    ensure_implementation(chain, logic)?;
    if initial_owner.is_zero() {
        return Err(ContractError::OwnableInvalidOwner { owner: initial_owner });
    }

    let admin = chain.create(ctx.address, Contract::ProxyAdmin(ProxyAdmin { owner: initial_owner }));
    chain.emit(
        admin,
        &IOwnable::OwnershipTransferred { previousOwner: Address::ZERO, newOwner: initial_owner },
    );

    chain.insert(
        ctx.address,
        Contract::Proxy(TransparentProxy { implementation: logic, admin, storage: Default::default() }),
    );
    chain.emit(ctx.address, &Abi::Upgraded { implementation: logic });
    chain.emit(ctx.address, &Abi::AdminChanged { previousAdmin: Address::ZERO, newAdmin: admin });
    debug!(proxy = %ctx.address, %admin, %logic, "proxy created");

    if !data.is_empty() {
        sci::execute(chain, ctx, data)?;
    }
    Ok(vec![("ProxyAdmin", admin)])
}

pub(crate) fn execute_proxy(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let proxy = *chain.proxy(ctx.address)?;
    if ctx.caller != proxy.admin {
        ensure_implementation(chain, proxy.implementation)?;
        return sci::execute(chain, ctx, input);
    }

    let Ok(TransparentUpgradeableProxyCalls::upgradeToAndCall(c)) =
        TransparentUpgradeableProxyCalls::abi_decode(input)
    else {
        return Err(ContractError::ProxyDeniedAdminAccess);
    };
    ensure_implementation(chain, c.newImplementation)?;
    chain.proxy_mut(ctx.address)?.implementation = c.newImplementation;
    debug!(proxy = %ctx.address, implementation = %c.newImplementation, "proxy upgraded");
    chain.emit(ctx.address, &Abi::Upgraded { implementation: c.newImplementation });

    if !c.data.is_empty() {
        sci::execute(chain, ctx, &c.data)?;
    }
    Ok(Bytes::new())
}

pub(crate) fn execute_admin(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let admin = *chain.proxy_admin(ctx.address)?;
    let only_owner = || {
        if ctx.caller == admin.owner {
            Ok(())
        } else {
            Err(ContractError::OwnableUnauthorizedAccount { account: ctx.caller })
        }
    };

    if let Ok(ProxyAdminCalls::upgradeAndCall(c)) = ProxyAdminCalls::abi_decode(input) {
        only_owner()?;
        let upgrade = Abi::upgradeToAndCallCall { newImplementation: c.implementation, data: c.data };
        chain.call(ctx.address, c.proxy, &upgrade.abi_encode())?;
        return Ok(Bytes::new());
    }

    match IOwnableCalls::abi_decode(input).map_err(|_| unknown_selector(ctx, input))? {
        IOwnableCalls::owner(_) => Ok(admin.owner.abi_encode().into()),
        IOwnableCalls::transferOwnership(c) => {
            only_owner()?;
            if c.newOwner.is_zero() {
                return Err(ContractError::OwnableInvalidOwner { owner: c.newOwner });
            }
            chain.proxy_admin_mut(ctx.address)?.owner = c.newOwner;
            chain.emit(
                ctx.address,
                &IOwnable::OwnershipTransferred { previousOwner: admin.owner, newOwner: c.newOwner },
            );
            Ok(Bytes::new())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ContractSpec;
    use alloy::sol_types::SolEvent;
    use sci_bindings::{ProxyAdmin as AdminAbi, Sci as SciAbi};

    const OWNER: Address = Address::repeat_byte(0x01);
    const REGISTRY: Address = Address::repeat_byte(0x0f);

    fn setup() -> (Chain, Address, Address) {
        let mut chain = Chain::new(1);
        let logic = chain.deploy(OWNER, ContractSpec::Sci).unwrap().address;
        let init = SciAbi::initializeCall { initialOwner: OWNER, registryAddress: REGISTRY };
        let deployed = chain
            .deploy(
                OWNER,
                ContractSpec::TransparentProxy {
                    logic,
                    initial_owner: OWNER,
                    data: init.abi_encode().into(),
                },
            )
            .unwrap();
        let admin = deployed.derived("ProxyAdmin").unwrap();
        (chain, deployed.address, admin)
    }

    #[test]
    fn deployment_reports_admin() {
        let mut chain = Chain::new(1);
        let logic = chain.deploy(OWNER, ContractSpec::Sci).unwrap().address;
        let deployed = chain
            .deploy(
                OWNER,
                ContractSpec::TransparentProxy { logic, initial_owner: OWNER, data: Bytes::new() },
            )
            .unwrap();
        let admin = deployed.derived("ProxyAdmin").unwrap();
        assert_eq!(admin, deployed.address.create(1));

        let changed = deployed
            .logs
            .iter()
            .find_map(|log| Abi::AdminChanged::decode_log_data(&log.data).ok())
            .unwrap();
        assert_eq!(changed.newAdmin, admin);
        assert_eq!(chain.proxy_admin(admin).unwrap().owner(), OWNER);
    }

    #[test]
    fn proxy_is_initialized_once() {
        let (mut chain, proxy, _) = setup();
        let storage = chain.sci_storage(proxy).unwrap();
        assert_eq!(storage.owner(), OWNER);
        assert_eq!(storage.registry(), REGISTRY);

        let err = chain
            .send(OWNER, proxy, &SciAbi::initializeCall { initialOwner: OWNER, registryAddress: REGISTRY })
            .unwrap_err();
        assert_eq!(err, ContractError::InvalidInitialization);
    }

    #[test]
    fn upgrade_keeps_storage() {
        let (mut chain, proxy, admin) = setup();
        let next = chain.deploy(OWNER, ContractSpec::Sci).unwrap().address;
        let upgrade = AdminAbi::upgradeAndCallCall { proxy, implementation: next, data: Bytes::new() };

        let stranger = Address::repeat_byte(0x02);
        let err = chain.send(stranger, admin, &upgrade).unwrap_err();
        assert_eq!(err, ContractError::OwnableUnauthorizedAccount { account: stranger });

        let receipt = chain.send(OWNER, admin, &upgrade).unwrap();
        let upgraded: Abi::Upgraded = receipt.event().unwrap();
        assert_eq!(upgraded.implementation, next);
        assert_eq!(chain.proxy(proxy).unwrap().implementation(), next);
        assert_eq!(chain.sci_storage(proxy).unwrap().registry(), REGISTRY);
    }

    #[test]
    fn admin_cannot_reach_implementation() {
        let (mut chain, proxy, admin) = setup();
        // Only the proxy admin contract itself is the proxy's admin.
        let err = chain.send(admin, proxy, &SciAbi::registryCall {}).unwrap_err();
        assert_eq!(err, ContractError::ProxyDeniedAdminAccess);
    }
}
