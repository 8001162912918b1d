use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{borrow::Cow, fmt, str::FromStr};

/// Error type for parsing a [`DeploymentKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid deployment key {0:?}, expected <Module>#<Contract>")]
pub struct ParseKeyError(String);

/// Identifier of a deployed contract inside a deployment manifest, in the
/// form `<ModuleId>#<ContractName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeploymentKey(Cow<'static, str>);

impl DeploymentKey {
    /// `SciRegistry#SciRegistry`.
    pub const SCI_REGISTRY: Self = Self::from_static("SciRegistry#SciRegistry");
    /// `EnsRegistrar#EnsRegistrar`.
    pub const ENS_REGISTRAR: Self = Self::from_static("EnsRegistrar#EnsRegistrar");
    /// `SciRegstrar#SciRegistrar`. The module id is spelled as in the
    /// published manifests.
    pub const SCI_REGISTRAR: Self = Self::from_static("SciRegstrar#SciRegistrar");
    /// `SuperChainTargetRegistrar#SuperChainTargetRegistrar`.
    pub const SUPER_CHAIN_TARGET_REGISTRAR: Self =
        Self::from_static("SuperChainTargetRegistrar#SuperChainTargetRegistrar");
    /// `PublicListVerifier#PublicListVerifier`.
    pub const PUBLIC_LIST_VERIFIER: Self =
        Self::from_static("PublicListVerifier#PublicListVerifier");
    /// `ProxyModule#SCI`, the SCI implementation.
    pub const SCI_IMPLEMENTATION: Self = Self::from_static("ProxyModule#SCI");
    /// `ProxyModule#TransparentUpgradeableProxy`.
    pub const SCI_PROXY: Self = Self::from_static("ProxyModule#TransparentUpgradeableProxy");
    /// `ProxyModule#ProxyAdmin`.
    pub const PROXY_ADMIN: Self = Self::from_static("ProxyModule#ProxyAdmin");
    /// `SciModule#SCI`, the SCI handle at the proxy address.
    pub const SCI: Self = Self::from_static("SciModule#SCI");

    /// Keys of the contracts published for every production chain.
    pub const PUBLISHED: [Self; 8] = [
        Self::SCI_IMPLEMENTATION,
        Self::SCI_REGISTRY,
        Self::ENS_REGISTRAR,
        Self::PUBLIC_LIST_VERIFIER,
        Self::SCI_PROXY,
        Self::PROXY_ADMIN,
        Self::SCI,
        Self::SCI_REGISTRAR,
    ];

    const fn from_static(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }

    /// Build a key from a module id and a contract (or future) name.
    pub fn new(module: &str, name: &str) -> Self {
        Self(Cow::Owned(format!("{module}#{name}")))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The module id part of the key.
    pub fn module(&self) -> &str {
        self.split().0
    }

    /// The contract name part of the key.
    pub fn contract(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        self.0.split_once('#').unwrap_or((&self.0, ""))
    }
}

impl fmt::Display for DeploymentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeploymentKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('#') {
            Some((module, name))
                if !module.is_empty() && !name.is_empty() && !name.contains('#') =>
            {
                Ok(Self(Cow::Owned(s.to_string())))
            }
            _ => Err(ParseKeyError(s.to_string())),
        }
    }
}

impl Serialize for DeploymentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DeploymentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_parts() {
        let key = DeploymentKey::SCI_REGISTRAR;
        assert_eq!(key.module(), "SciRegstrar");
        assert_eq!(key.contract(), "SciRegistrar");
        assert_eq!(DeploymentKey::new("SciRegistry", "SciRegistry"), DeploymentKey::SCI_REGISTRY);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("SciRegistry".parse::<DeploymentKey>().is_err());
        assert!("#SciRegistry".parse::<DeploymentKey>().is_err());
        assert!("a#b#c".parse::<DeploymentKey>().is_err());
        assert_eq!(
            "ProxyModule#ProxyAdmin".parse::<DeploymentKey>().unwrap(),
            DeploymentKey::PROXY_ADMIN
        );
    }

    #[test]
    fn serde_as_plain_string() {
        let json = serde_json::to_string(&DeploymentKey::SCI).unwrap();
        assert_eq!(json, "\"SciModule#SCI\"");
        let back: DeploymentKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeploymentKey::SCI);
    }
}
