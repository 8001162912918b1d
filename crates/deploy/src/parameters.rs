use crate::{manifest::read_json, DeployError, ManifestError};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, path::Path};

/// Module parameters, in the Ignition parameters file layout:
/// `{ "<ModuleId>": { "<name>": <value> } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, BTreeMap<String, Value>>);

impl Parameters {
    /// No parameters.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Read a parameters file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        read_json(path)
    }

    /// Set a parameter.
    pub fn set(&mut self, module: &str, name: &str, value: impl Into<Value>) -> &mut Self {
        self.0.entry(module.to_owned()).or_default().insert(name.to_owned(), value.into());
        self
    }

    /// Set an address parameter.
    pub fn with_address(mut self, module: &str, name: &str, address: Address) -> Self {
        self.set(module, name, address.to_checksum(None));
        self
    }

    /// Get a raw parameter.
    pub fn get(&self, module: &str, name: &str) -> Option<&Value> {
        self.0.get(module)?.get(name)
    }

    /// Get an address parameter.
    pub fn address(&self, module: &'static str, name: &'static str) -> Result<Address, DeployError> {
        let value = self.get(module, name).ok_or(DeployError::MissingParameter { module, name })?;
        value
            .as_str()
            .ok_or_else(|| "expected a hex string".to_owned())
            .and_then(|s| s.parse::<Address>().map_err(|e| e.to_string()))
            .map_err(|reason| DeployError::InvalidParameter { module, name, reason })
    }

    /// Get an address parameter that may also be set under `alias`. `name`
    /// wins when both are present.
    pub fn address_or(
        &self,
        module: &'static str,
        name: &'static str,
        alias: &'static str,
    ) -> Result<Address, DeployError> {
        if self.get(module, name).is_none() && self.get(module, alias).is_some() {
            return self.address(module, alias);
        }
        self.address(module, name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_ignition_layout() {
        let params: Parameters = serde_json::from_str(
            r#"{ "CleanupModule": { "ensRegistrarAddress": "0x0000000000000000000000000000000000000001" } }"#,
        )
        .unwrap();
        assert_eq!(
            params.address("CleanupModule", "ensRegistrarAddress").unwrap(),
            Address::with_last_byte(1)
        );
        assert!(matches!(
            params.address("CleanupModule", "other"),
            Err(DeployError::MissingParameter { .. })
        ));
    }

    #[test]
    fn messenger_spellings() {
        let params: Parameters = serde_json::from_str(
            r#"{
                "EnsRegistrar": { "l1CrossDomainMessangerAddress": "0x0000000000000000000000000000000000000002" },
                "SuperChainTargetRegistrar": {
                    "l2CrossDomainMessangerAddress": "0x0000000000000000000000000000000000000003",
                    "l2CrossDomainMessengerAddress": "0x0000000000000000000000000000000000000004"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            params
                .address_or("EnsRegistrar", "l1CrossDomainMessengerAddress", "l1CrossDomainMessangerAddress")
                .unwrap(),
            Address::with_last_byte(2)
        );
        assert_eq!(
            params
                .address_or(
                    "SuperChainTargetRegistrar",
                    "l2CrossDomainMessengerAddress",
                    "l2CrossDomainMessangerAddress"
                )
                .unwrap(),
            Address::with_last_byte(4)
        );
        assert!(matches!(
            params.address_or("EnsRegistrar", "ensRegistryAddress", "ensRegistry"),
            Err(DeployError::MissingParameter { name: "ensRegistryAddress", .. })
        ));
    }

    #[test]
    fn rejects_non_address() {
        let mut params = Parameters::new();
        params.set("EnsRegistrar", "ensRegistryAddress", 7);
        assert!(matches!(
            params.address("EnsRegistrar", "ensRegistryAddress"),
            Err(DeployError::InvalidParameter { .. })
        ));
    }
}
