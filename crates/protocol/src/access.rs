use crate::{CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes, B256},
    sol_types::{SolCall, SolInterface, SolValue},
};
use sci_bindings::IAccessControl::{self, IAccessControlCalls};
use sci_constants::{Role, DEFAULT_ADMIN_ROLE};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Role table of an access-controlled contract.
///
/// Possession is an explicit `(role, account)` set. [`AccessControl::grant`]
/// and [`AccessControl::revoke`] are the only mutators, and every mutating
/// entry point of the owning contract checks [`AccessControl::check_role`]
/// before touching state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControl {
    grants: BTreeSet<(B256, Address)>,
    admins: BTreeMap<B256, B256>,
    default_admin_delay: u64,
}

impl AccessControl {
    /// Create a table where `default_admin` holds [`Role::DefaultAdmin`].
    pub fn new(default_admin: Address, default_admin_delay: u64) -> Self {
        let mut access = Self { default_admin_delay, ..Default::default() };
        access.grant(DEFAULT_ADMIN_ROLE, default_admin);
        access
    }

    /// Delay applied to default admin transfers.
    pub const fn default_admin_delay(&self) -> u64 {
        self.default_admin_delay
    }

    /// True if `account` holds `role`.
    pub fn has_role(&self, role: impl Into<B256>, account: Address) -> bool {
        self.grants.contains(&(role.into(), account))
    }

    /// Fail with [`ContractError::Unauthorized`] unless `account` holds
    /// `role`.
    pub fn check_role(&self, role: impl Into<B256>, account: Address) -> Result<()> {
        let role = role.into();
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(ContractError::Unauthorized { account, role })
        }
    }

    /// The role allowed to grant and revoke `role`.
    pub fn role_admin(&self, role: B256) -> B256 {
        self.admins.get(&role).copied().unwrap_or(DEFAULT_ADMIN_ROLE)
    }

    /// Accounts currently holding `role`.
    pub fn members(&self, role: impl Into<B256>) -> impl Iterator<Item = Address> + '_ {
        let role = role.into();
        self.grants.range((role, Address::ZERO)..=(role, Address::repeat_byte(0xff))).map(|(_, a)| *a)
    }

    pub(crate) fn set_role_admin(&mut self, role: Role, admin: Role) {
        self.admins.insert(role.id(), admin.id());
    }

    /// Record a grant. Returns `false` if the account already held the role.
    pub(crate) fn grant(&mut self, role: B256, account: Address) -> bool {
        self.grants.insert((role, account))
    }

    /// Remove a grant. Returns `false` if the account did not hold the role.
    pub(crate) fn revoke(&mut self, role: B256, account: Address) -> bool {
        self.grants.remove(&(role, account))
    }
}

/// Handle the [`IAccessControl`] functions of the contract at
/// `ctx.address`. Returns `None` if the selector is not one of them.
pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Option<Result<Bytes>> {
    let selector: [u8; 4] = input.get(..4)?.try_into().ok()?;
    if !IAccessControlCalls::valid_selector(selector) {
        return None;
    }
    Some(execute_inner(chain, ctx, input))
}

fn execute_inner(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let call = IAccessControlCalls::abi_decode(input)?;
    let access = chain.access_mut(ctx.address)?;

    match call {
        IAccessControlCalls::hasRole(c) => {
            Ok(access.has_role(c.role, c.account).abi_encode().into())
        }
        IAccessControlCalls::getRoleAdmin(c) => Ok(access.role_admin(c.role).abi_encode().into()),
        IAccessControlCalls::grantRole(c) => {
            access.check_role(access.role_admin(c.role), ctx.caller)?;
            if access.grant(c.role, c.account) {
                debug!(role = %c.role, account = %c.account, contract = %ctx.address, "role granted");
                chain.emit(
                    ctx.address,
                    &IAccessControl::RoleGranted {
                        role: c.role,
                        account: c.account,
                        sender: ctx.caller,
                    },
                );
            }
            Ok(Bytes::new())
        }
        IAccessControlCalls::revokeRole(c) => {
            access.check_role(access.role_admin(c.role), ctx.caller)?;
            if access.revoke(c.role, c.account) {
                debug!(role = %c.role, account = %c.account, contract = %ctx.address, "role revoked");
                chain.emit(
                    ctx.address,
                    &IAccessControl::RoleRevoked {
                        role: c.role,
                        account: c.account,
                        sender: ctx.caller,
                    },
                );
            }
            Ok(Bytes::new())
        }
        IAccessControlCalls::renounceRole(c) => {
            if c.callerConfirmation != ctx.caller {
                return Err(ContractError::BadConfirmation);
            }
            if access.revoke(c.role, ctx.caller) {
                chain.emit(
                    ctx.address,
                    &IAccessControl::RoleRevoked {
                        role: c.role,
                        account: ctx.caller,
                        sender: ctx.caller,
                    },
                );
            }
            Ok(Bytes::new())
        }
    }
}

/// ABI-encoded `grantRole` call.
pub fn grant_role_call(role: Role, account: Address) -> Bytes {
    IAccessControl::grantRoleCall { role: role.id(), account }.abi_encode().into()
}

/// ABI-encoded `revokeRole` call.
pub fn revoke_role_call(role: Role, account: Address) -> Bytes {
    IAccessControl::revokeRoleCall { role: role.id(), account }.abi_encode().into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_admin_administers_everything() {
        let admin = Address::repeat_byte(1);
        let access = AccessControl::new(admin, 0);
        assert!(access.has_role(Role::DefaultAdmin, admin));
        assert_eq!(access.role_admin(Role::Registrar.id()), DEFAULT_ADMIN_ROLE);
    }

    #[test]
    fn check_role_reports_account_and_role() {
        let access = AccessControl::new(Address::repeat_byte(1), 0);
        let stranger = Address::repeat_byte(2);
        let err = access.check_role(Role::Pauser, stranger).unwrap_err();
        assert!(err.is_unauthorized(stranger, Role::Pauser));
    }

    #[test]
    fn members_are_scoped_to_role() {
        let mut access = AccessControl::new(Address::repeat_byte(1), 0);
        access.grant(Role::Registrar.id(), Address::repeat_byte(2));
        access.grant(Role::Registrar.id(), Address::repeat_byte(3));
        access.grant(Role::Pauser.id(), Address::repeat_byte(4));
        let members: Vec<_> = access.members(Role::Registrar).collect();
        assert_eq!(members, vec![Address::repeat_byte(2), Address::repeat_byte(3)]);
    }
}
