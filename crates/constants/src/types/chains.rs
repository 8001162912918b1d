use std::{fmt, str::FromStr};

/// The list of known chains as a string.
const KNOWN_CHAINS: &str = "optimism (10), sepolia (11155111), localhost (31337)";

/// Error type for parsing struct from a chain name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseChainError {
    /// The chain name is not supported.
    #[error("chain {0} is not parseable. supported chains: {KNOWN_CHAINS}")]
    ChainNotSupported(String),
}

/// Chains the SCI contracts are deployed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownChains {
    /// OP mainnet.
    Optimism,
    /// Ethereum Sepolia testnet.
    Sepolia,
    /// Local hardhat/anvil node. Never published in manifests.
    Localhost,
}

impl KnownChains {
    /// All known chains.
    pub const ALL: [KnownChains; 3] =
        [KnownChains::Optimism, KnownChains::Sepolia, KnownChains::Localhost];

    /// The chain id.
    pub const fn chain_id(&self) -> u64 {
        match self {
            Self::Optimism => crate::optimism::CHAIN_ID,
            Self::Sepolia => crate::sepolia::CHAIN_ID,
            Self::Localhost => crate::localhost::CHAIN_ID,
        }
    }

    /// The network name used in configuration and environment variables.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Optimism => "optimism",
            Self::Sepolia => "sepolia",
            Self::Localhost => "localhost",
        }
    }

    /// Find the chain with the given id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.chain_id() == chain_id)
    }

    /// True for chains that only exist locally.
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Localhost)
    }
}

impl fmt::Display for KnownChains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KnownChains {
    type Err = ParseChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(id) = s.parse::<u64>() {
            return Self::from_chain_id(id).ok_or(ParseChainError::ChainNotSupported(s));
        }
        match s.as_str() {
            "optimism" | "op" => Ok(Self::Optimism),
            "sepolia" => Ok(Self::Sepolia),
            "localhost" | "hardhat" => Ok(Self::Localhost),
            _ => Err(ParseChainError::ChainNotSupported(s)),
        }
    }
}
