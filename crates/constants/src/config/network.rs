use crate::{
    config::env_utils::{load_bool_opt, load_string_opt, load_url},
    ConfigError, KnownChains,
};
use std::borrow::Cow;

/// How transactions for a network are signed.
#[derive(Clone, PartialEq, Eq)]
pub enum SignerConfig {
    /// A raw private key, hex encoded.
    PrivateKey(String),
    /// A WalletConnect session. The pairing URI is rendered through the QR
    /// code service at `qr_code_url`.
    WalletConnect {
        /// Base URL of the QR code renderer.
        qr_code_url: Cow<'static, str>,
    },
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrivateKey(_) => f.write_str("PrivateKey(..)"),
            Self::WalletConnect { qr_code_url } => {
                f.debug_struct("WalletConnect").field("qr_code_url", qr_code_url).finish()
            }
        }
    }
}

/// Default QR code renderer for WalletConnect pairing URIs.
pub const DEFAULT_QR_CODE_URL: &str = "https://kissapi-qrcode.vercel.app/api/qrcode?chl=";

/// A network entry: chain, RPC endpoint and signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The chain.
    pub chain: KnownChains,
    /// The RPC endpoint.
    pub rpc_url: Cow<'static, str>,
    /// How to sign transactions.
    pub signer: SignerConfig,
}

impl NetworkConfig {
    /// Load the entry for `chain` from the environment.
    ///
    /// Reads `<NAME>_RPC_URL`, then either `<NAME>_PRIVATE_KEY` or
    /// `<NAME>_USE_WALLET_CONNECT` (with optional `<NAME>_QR_CODE_URL`), where
    /// `<NAME>` is the upper-cased network name.
    pub fn from_env(chain: KnownChains) -> Result<Self, ConfigError> {
        let prefix = chain.name().to_uppercase();
        let rpc_url = load_url(&format!("{prefix}_RPC_URL"))?;

        let signer = if let Some(key) = load_string_opt(&format!("{prefix}_PRIVATE_KEY")) {
            SignerConfig::PrivateKey(key)
        } else if load_bool_opt(&format!("{prefix}_USE_WALLET_CONNECT"))?.unwrap_or_default() {
            let qr_code_url = load_string_opt(&format!("{prefix}_QR_CODE_URL"))
                .map(Cow::Owned)
                .unwrap_or(Cow::Borrowed(DEFAULT_QR_CODE_URL));
            SignerConfig::WalletConnect { qr_code_url }
        } else {
            return Err(ConfigError::NoSigner(chain.name().to_string()));
        };

        tracing::debug!(%chain, %rpc_url, "loaded network config");
        Ok(Self { chain, rpc_url, signer })
    }

    /// The chain id of the network.
    pub const fn chain_id(&self) -> u64 {
        self.chain.chain_id()
    }
}
