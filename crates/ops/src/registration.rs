use crate::multisig::{BatchError, Multisig, Proposal};
use alloy::primitives::{Address, B256, U256};
use sci_bindings::{namehash, PublicListVerifier, SciRegistrar};
use sci_protocol::{Call, Chain, ContractError, ANY_CHAIN};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, path::Path, str::FromStr};
use tracing::{debug, info_span, instrument};

/// Errors raised while registering a public list.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The list file could not be read.
    #[error("reading {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The list file is not a valid public list.
    #[error("parsing {path}: {source}")]
    Json {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A transaction for `domain` reverted.
    #[error("registering {domain}: {source}")]
    Reverted {
        /// Domain being registered.
        domain: String,
        /// Revert reason.
        #[source]
        source: ContractError,
    },
    /// The list has no domains.
    #[error("public list is empty")]
    Empty,
    /// Batch proposal failure.
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Chain id of a list entry. Accepts a JSON number, a decimal or `0x` string,
/// or `"*"` for every chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ListedChain(pub U256);

impl ListedChain {
    /// Matches every chain.
    pub const ANY: Self = Self(ANY_CHAIN);
}

impl From<u64> for ListedChain {
    fn from(id: u64) -> Self {
        Self(U256::from(id))
    }
}

impl<'de> Deserialize<'de> for ListedChain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n.into()),
            Raw::Text(s) if s == "*" => Ok(Self::ANY),
            Raw::Text(s) => U256::from_str(&s).map(Self).map_err(serde::de::Error::custom),
        }
    }
}

/// Domains mapped to the contracts to list under them, each with the chain
/// ids it is deployed on.
///
/// ```json
/// { "app.uniswap.org": { "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2": [1] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicList(BTreeMap<String, BTreeMap<Address, Vec<ListedChain>>>);

impl PublicList {
    /// An empty list.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Read a list from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistrationError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| RegistrationError::Io { path: display.clone(), source })?;
        serde_json::from_str(&raw).map_err(|source| RegistrationError::Json { path: display, source })
    }

    /// List `contract` under `domain` for `chains`.
    pub fn add(
        &mut self,
        domain: impl Into<String>,
        contract: Address,
        chains: impl IntoIterator<Item = ListedChain>,
    ) -> &mut Self {
        self.0.entry(domain.into()).or_default().entry(contract).or_default().extend(chains);
        self
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the list has no domains.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over domains and their contracts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<Address, Vec<ListedChain>>)> {
        self.0.iter().map(|(d, c)| (d.as_str(), c))
    }
}

/// Contracts a registration talks to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegistrationTargets {
    /// `SciRegistry`, queried for ownership.
    pub registry: Address,
    /// Contract taking `registerDomainWithVerifier`: a registrar, or the
    /// registry itself when the sender holds `REGISTRAR_ROLE`.
    pub registrar: Address,
    /// `PublicListVerifier` receiving the entries.
    pub verifier: Address,
}

/// What a registration run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Domains that were newly registered.
    pub registered: Vec<String>,
    /// Domains already owned by the sender.
    pub already_owned: Vec<String>,
    /// Number of contract entries submitted.
    pub entries: usize,
}

impl RegistrationTargets {
    /// Calls registering `domain` for `owner`, if needed, and listing its
    /// contracts.
    fn calls(
        &self,
        chain: &Chain,
        owner: Address,
        domain: &str,
        contracts: &BTreeMap<Address, Vec<ListedChain>>,
        report: &mut RegistrationReport,
    ) -> Result<Vec<Call>, RegistrationError> {
        let domain_hash = namehash(domain);
        let owned = chain
            .registry(self.registry)
            .map(|r| r.is_owner(domain_hash, owner))
            .map_err(|source| RegistrationError::Reverted { domain: domain.to_owned(), source })?;

        let mut calls = Vec::with_capacity(2);
        if owned {
            report.already_owned.push(domain.to_owned());
        } else {
            calls.push(Call::new(
                self.registrar,
                &SciRegistrar::registerDomainWithVerifierCall {
                    owner,
                    domainHash: domain_hash,
                    verifier: self.verifier,
                },
            ));
            report.registered.push(domain.to_owned());
        }

        report.entries += contracts.len();
        calls.push(Call::new(self.verifier, &add_addresses(domain_hash, contracts)));
        Ok(calls)
    }

    /// Register every domain in `list` from `sender`, one transaction per
    /// step. Stops at the first revert; earlier domains stay registered.
    #[instrument(skip_all, fields(sender = %sender, domains = list.len()))]
    pub fn register_sequential(
        &self,
        chain: &mut Chain,
        sender: Address,
        list: &PublicList,
    ) -> Result<RegistrationReport, RegistrationError> {
        if list.is_empty() {
            return Err(RegistrationError::Empty);
        }
        let mut report = RegistrationReport::default();
        for (domain, contracts) in list.iter() {
            let _span = info_span!("domain", domain).entered();
            for call in self.calls(chain, sender, domain, contracts, &mut report)? {
                chain
                    .transact(sender, call.to, call.data)
                    .map_err(|source| RegistrationError::Reverted { domain: domain.to_owned(), source })?;
            }
            debug!(contracts = contracts.len(), "domain listed");
        }
        Ok(report)
    }

    /// Accumulate every registration into one multisig proposal owned by the
    /// multisig account.
    #[instrument(skip_all, fields(multisig = %multisig.account(), domains = list.len()))]
    pub fn propose_batch(
        &self,
        chain: &Chain,
        multisig: &mut Multisig,
        list: &PublicList,
    ) -> Result<(Proposal, RegistrationReport), RegistrationError> {
        if list.is_empty() {
            return Err(RegistrationError::Empty);
        }
        let owner = multisig.account();
        let mut report = RegistrationReport::default();
        let mut calls = Vec::new();
        for (domain, contracts) in list.iter() {
            calls.extend(self.calls(chain, owner, domain, contracts, &mut report)?);
        }
        let proposal = multisig.propose(calls)?;
        debug!(nonce = proposal.nonce(), calls = proposal.calls().len(), "registration batch proposed");
        Ok((proposal, report))
    }
}

fn add_addresses(
    domain_hash: B256,
    contracts: &BTreeMap<Address, Vec<ListedChain>>,
) -> PublicListVerifier::addAddressesCall {
    let (addresses, chain_ids) = contracts
        .iter()
        .map(|(address, chains)| (*address, chains.iter().map(|c| c.0).collect::<Vec<_>>()))
        .unzip();
    PublicListVerifier::addAddressesCall {
        domainHash: domain_hash,
        contractAddresses: addresses,
        chainIds: chain_ids,
    }
}
