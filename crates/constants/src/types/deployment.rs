use crate::{DeploymentKey, KnownChains};
use alloy::primitives::Address;

/// Addresses of a published SCI deployment on one chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SciDeployment {
    /// The chain the contracts live on.
    chain_id: u64,
    /// `SciRegistry` address.
    registry: Address,
    /// `EnsRegistrar` address.
    ens_registrar: Address,
    /// `SciRegistrar` address.
    sci_registrar: Address,
    /// `PublicListVerifier` address.
    public_list_verifier: Address,
    /// `SCI` implementation address.
    sci_implementation: Address,
    /// `TransparentUpgradeableProxy` address, where SCI is used from.
    sci_proxy: Address,
    /// `ProxyAdmin` address.
    proxy_admin: Address,
}

impl SciDeployment {
    /// Create a new deployment record.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        chain_id: u64,
        registry: Address,
        ens_registrar: Address,
        sci_registrar: Address,
        public_list_verifier: Address,
        sci_implementation: Address,
        sci_proxy: Address,
        proxy_admin: Address,
    ) -> Self {
        Self {
            chain_id,
            registry,
            ens_registrar,
            sci_registrar,
            public_list_verifier,
            sci_implementation,
            sci_proxy,
            proxy_admin,
        }
    }

    /// Get the published deployment for a known chain, if any.
    pub const fn for_chain(chain: KnownChains) -> Option<Self> {
        match chain {
            KnownChains::Optimism => Some(crate::optimism::DEPLOYMENT),
            KnownChains::Sepolia => Some(crate::sepolia::DEPLOYMENT),
            KnownChains::Localhost => None,
        }
    }

    /// Get the chain id.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get the registry address.
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Get the ENS registrar address.
    pub const fn ens_registrar(&self) -> Address {
        self.ens_registrar
    }

    /// Get the SCI registrar address.
    pub const fn sci_registrar(&self) -> Address {
        self.sci_registrar
    }

    /// Get the public list verifier address.
    pub const fn public_list_verifier(&self) -> Address {
        self.public_list_verifier
    }

    /// Get the SCI implementation address.
    pub const fn sci_implementation(&self) -> Address {
        self.sci_implementation
    }

    /// Get the SCI proxy address.
    pub const fn sci_proxy(&self) -> Address {
        self.sci_proxy
    }

    /// Get the proxy admin address.
    pub const fn proxy_admin(&self) -> Address {
        self.proxy_admin
    }

    /// Iterate over the manifest entries of this deployment.
    pub fn entries(&self) -> impl Iterator<Item = (DeploymentKey, Address)> {
        [
            (DeploymentKey::SCI_IMPLEMENTATION, self.sci_implementation),
            (DeploymentKey::SCI_REGISTRY, self.registry),
            (DeploymentKey::ENS_REGISTRAR, self.ens_registrar),
            (DeploymentKey::PUBLIC_LIST_VERIFIER, self.public_list_verifier),
            (DeploymentKey::SCI_PROXY, self.sci_proxy),
            (DeploymentKey::PROXY_ADMIN, self.proxy_admin),
            (DeploymentKey::SCI, self.sci_proxy),
            (DeploymentKey::SCI_REGISTRAR, self.sci_registrar),
        ]
        .into_iter()
    }

    /// Look up an address by manifest key.
    pub fn address_of(&self, key: &DeploymentKey) -> Option<Address> {
        self.entries().find(|(k, _)| k == key).map(|(_, address)| address)
    }
}
