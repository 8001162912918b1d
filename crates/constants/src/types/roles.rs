use alloy::primitives::{keccak256, B256};
use std::{fmt, str::FromStr};

/// The admin role of every other role unless reassigned.
pub const DEFAULT_ADMIN_ROLE: B256 = B256::ZERO;

/// Error type for parsing a [`Role`] from its name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {0}")]
pub struct ParseRoleError(String);

/// Access-control roles used by the SCI contracts.
///
/// Role identifiers are `keccak256` of the role name, except for
/// [`Role::DefaultAdmin`] which is the zero word.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Administers all roles without an explicit admin.
    DefaultAdmin,
    /// Grants and revokes [`Role::Registrar`] on the registry.
    RegistrarManager,
    /// May register domains on the registry.
    Registrar,
    /// May call `registerDomain*` on a registrar.
    RegisterDomain,
    /// May pause and unpause the registry.
    Pauser,
}

impl Role {
    /// All known roles.
    pub const ALL: [Role; 5] = [
        Role::DefaultAdmin,
        Role::RegistrarManager,
        Role::Registrar,
        Role::RegisterDomain,
        Role::Pauser,
    ];

    /// The Solidity constant name of the role.
    pub const fn name(&self) -> &'static str {
        match self {
            Role::DefaultAdmin => "DEFAULT_ADMIN_ROLE",
            Role::RegistrarManager => "REGISTRAR_MANAGER_ROLE",
            Role::Registrar => "REGISTRAR_ROLE",
            Role::RegisterDomain => "REGISTER_DOMAIN_ROLE",
            Role::Pauser => "PAUSER_ROLE",
        }
    }

    /// The 32-byte role identifier.
    pub fn id(&self) -> B256 {
        match self {
            Role::DefaultAdmin => DEFAULT_ADMIN_ROLE,
            _ => keccak256(self.name()),
        }
    }

    /// Find the role with the given identifier.
    pub fn from_id(id: B256) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Role> for B256 {
    fn from(role: Role) -> Self {
        role.id()
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|role| role.name() == upper || role.name().trim_end_matches("_ROLE") == upper)
            .ok_or(ParseRoleError(upper))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let ids: std::collections::HashSet<_> = Role::ALL.iter().map(Role::id).collect();
        assert_eq!(ids.len(), Role::ALL.len());
        assert_eq!(Role::DefaultAdmin.id(), B256::ZERO);
    }

    #[test]
    fn round_trips_through_ids_and_names() {
        for role in Role::ALL {
            assert_eq!(Role::from_id(role.id()), Some(role));
            assert_eq!(role.name().parse::<Role>().unwrap(), role);
        }
        assert_eq!("register_domain".parse::<Role>().unwrap(), Role::RegisterDomain);
        assert!("minter".parse::<Role>().is_err());
    }
}
