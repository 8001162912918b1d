use crate::{
    manifest::{chain_dir, read_json, write_json},
    DeploymentManifest, ManifestError,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, path::Path};
use tracing::debug;

/// File holding a chain's executed call futures.
pub const JOURNAL_FILE: &str = "journal.json";

/// Call futures executed on a chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    chain_id: u64,
    executed: BTreeSet<String>,
}

impl Journal {
    /// An empty journal for `chain_id`.
    pub const fn new(chain_id: u64) -> Self {
        Self { chain_id, executed: BTreeSet::new() }
    }

    /// The chain the journal belongs to.
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// True if the call future ran.
    pub fn contains(&self, future: &str) -> bool {
        self.executed.contains(future)
    }

    /// Record a call future. Returns `false` if it was already recorded.
    pub fn record(&mut self, future: impl Into<String>) -> bool {
        self.executed.insert(future.into())
    }

    /// Executed futures, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.executed.iter().map(String::as_str)
    }

    /// Number of executed futures.
    pub fn len(&self) -> usize {
        self.executed.len()
    }

    /// True if nothing ran.
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}

/// Everything a deployment run knows about a chain: deployed contracts and
/// executed calls. Futures present here are not executed again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentState {
    addresses: DeploymentManifest,
    journal: Journal,
}

impl DeploymentState {
    /// An empty state for `chain_id`.
    pub const fn new(chain_id: u64) -> Self {
        Self { addresses: DeploymentManifest::new(), journal: Journal::new(chain_id) }
    }

    /// Load the state of `chain_id` from the deployments root. Missing files
    /// read as an empty state.
    pub fn load(root: &Path, chain_id: u64) -> Result<Self, ManifestError> {
        let dir = chain_dir(root, chain_id);
        let addresses = DeploymentManifest::load(&dir)?;
        let journal_path = dir.join(JOURNAL_FILE);
        let journal = if journal_path.exists() {
            read_json(&journal_path)?
        } else {
            Journal::new(chain_id)
        };
        debug!(chain_id, contracts = addresses.len(), calls = journal.len(), "loaded deployment state");
        Ok(Self { addresses, journal })
    }

    /// Write the state under the deployments root.
    pub fn save(&self, root: &Path) -> Result<(), ManifestError> {
        let dir = chain_dir(root, self.journal.chain_id);
        self.addresses.save(&dir)?;
        write_json(&dir.join(JOURNAL_FILE), &self.journal)
    }

    /// The chain id.
    pub const fn chain_id(&self) -> u64 {
        self.journal.chain_id
    }

    /// Deployed contracts.
    pub const fn addresses(&self) -> &DeploymentManifest {
        &self.addresses
    }

    /// Executed calls.
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    pub(crate) fn addresses_mut(&mut self) -> &mut DeploymentManifest {
        &mut self.addresses
    }

    pub(crate) fn journal_mut(&mut self) -> &mut Journal {
        &mut self.journal
    }
}
