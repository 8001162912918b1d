//! Deployment manifests.
//!
//! Each chain has a directory `chain-<chainId>` under the deployments root,
//! holding `deployed_addresses.json` (the [`DeploymentManifest`]) and
//! `journal.json` (see [`crate::DeploymentState`]). The
//! [`AggregatedManifest`] merges the per-chain manifests into one
//! `chainId -> key -> address` table.

use alloy::primitives::Address;
use sci_constants::{DeploymentKey, SciDeployment};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

/// File holding a chain's deployed addresses.
pub const DEPLOYED_ADDRESSES_FILE: &str = "deployed_addresses.json";

/// Prefix of per-chain deployment directories.
pub const CHAIN_DIR_PREFIX: &str = "chain-";

/// Errors reading or writing manifest files.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Filesystem error.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file or directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// Malformed JSON.
    #[error("malformed json in {}: {source}", path.display())]
    Json {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ManifestError::Io { path: path.to_owned(), source })?;
    serde_json::from_str(&raw).map_err(|source| ManifestError::Json { path: path.to_owned(), source })
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ManifestError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| ManifestError::Io { path: parent.to_owned(), source })?;
    }
    let mut raw = serde_json::to_string_pretty(value)
        .map_err(|source| ManifestError::Json { path: path.to_owned(), source })?;
    raw.push('\n');
    fs::write(path, raw).map_err(|source| ManifestError::Io { path: path.to_owned(), source })
}

/// Directory of `chain_id` under the deployments root.
pub fn chain_dir(root: &Path, chain_id: u64) -> PathBuf {
    root.join(format!("{CHAIN_DIR_PREFIX}{chain_id}"))
}

/// Parse a `chain-<digits>` directory name.
pub fn parse_chain_dir(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(CHAIN_DIR_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Addresses deployed on one chain, by `<Module>#<Contract>` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentManifest(BTreeMap<DeploymentKey, Address>);

impl DeploymentManifest {
    /// An empty manifest.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Read `deployed_addresses.json` from a chain directory. A missing file
    /// reads as an empty manifest.
    pub fn load(chain_dir: &Path) -> Result<Self, ManifestError> {
        let path = chain_dir.join(DEPLOYED_ADDRESSES_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        read_json(&path)
    }

    /// Write `deployed_addresses.json` into a chain directory.
    pub fn save(&self, chain_dir: &Path) -> Result<(), ManifestError> {
        write_json(&chain_dir.join(DEPLOYED_ADDRESSES_FILE), self)
    }

    /// Address recorded for `key`.
    pub fn get(&self, key: &DeploymentKey) -> Option<Address> {
        self.0.get(key).copied()
    }

    /// Record an address, returning the previous one.
    pub fn insert(&mut self, key: DeploymentKey, address: Address) -> Option<Address> {
        self.0.insert(key, address)
    }

    /// True if `key` is recorded.
    pub fn contains(&self, key: &DeploymentKey) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over the entries, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&DeploymentKey, &Address)> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extract the published deployment, if every published key is present.
    pub fn to_deployment(&self, chain_id: u64) -> Option<SciDeployment> {
        Some(SciDeployment::new(
            chain_id,
            self.get(&DeploymentKey::SCI_REGISTRY)?,
            self.get(&DeploymentKey::ENS_REGISTRAR)?,
            self.get(&DeploymentKey::SCI_REGISTRAR)?,
            self.get(&DeploymentKey::PUBLIC_LIST_VERIFIER)?,
            self.get(&DeploymentKey::SCI_IMPLEMENTATION)?,
            self.get(&DeploymentKey::SCI_PROXY)?,
            self.get(&DeploymentKey::PROXY_ADMIN)?,
        ))
    }
}

impl FromIterator<(DeploymentKey, Address)> for DeploymentManifest {
    fn from_iter<I: IntoIterator<Item = (DeploymentKey, Address)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<SciDeployment> for DeploymentManifest {
    fn from(deployment: SciDeployment) -> Self {
        deployment.entries().collect()
    }
}

/// Manifests of several chains, keyed by chain id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedManifest(BTreeMap<u64, DeploymentManifest>);

impl AggregatedManifest {
    /// An empty manifest.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Scan `root` for `chain-<digits>` directories and collect their
    /// manifests. Chains in `excluded` are left out. Chains whose manifest
    /// cannot be read are skipped with a warning.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub fn build(root: &Path, excluded: &[u64]) -> Result<Self, ManifestError> {
        let entries =
            fs::read_dir(root).map_err(|source| ManifestError::Io { path: root.to_owned(), source })?;

        let mut manifest = Self::new();
        for entry in entries {
            let entry = entry.map_err(|source| ManifestError::Io { path: root.to_owned(), source })?;
            let name = entry.file_name();
            let Some(chain_id) = name.to_str().and_then(parse_chain_dir) else {
                continue;
            };
            if excluded.contains(&chain_id) {
                debug!(chain_id, "excluded chain");
                continue;
            }

            let path = entry.path().join(DEPLOYED_ADDRESSES_FILE);
            match read_json::<DeploymentManifest>(&path) {
                Ok(chain) => {
                    debug!(chain_id, contracts = chain.len(), "collected chain");
                    manifest.insert(chain_id, chain);
                }
                Err(err) => warn!(chain_id, %err, "skipping chain, failed to read {DEPLOYED_ADDRESSES_FILE}"),
            }
        }
        Ok(manifest)
    }

    /// Read an aggregated manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        read_json(path)
    }

    /// Write the manifest to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        write_json(path, self)
    }

    /// Add or replace the manifest of a chain.
    pub fn insert(&mut self, chain_id: u64, manifest: DeploymentManifest) {
        self.0.insert(chain_id, manifest);
    }

    /// Manifest of a chain.
    pub fn chain(&self, chain_id: u64) -> Option<&DeploymentManifest> {
        self.0.get(&chain_id)
    }

    /// Look up an address.
    pub fn address(&self, chain_id: u64, key: &DeploymentKey) -> Option<Address> {
        self.chain(chain_id)?.get(key)
    }

    /// Chain ids present, ascending.
    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.keys().copied()
    }

    /// Iterate over the chains.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &DeploymentManifest)> {
        self.0.iter().map(|(id, manifest)| (*id, manifest))
    }

    /// Number of chains.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no chain is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
