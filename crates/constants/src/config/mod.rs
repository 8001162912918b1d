mod error;
pub use error::ConfigError;

/// Helpers for reading typed values from environment variables.
pub mod env_utils;

mod network;
pub use network::{NetworkConfig, SignerConfig, DEFAULT_QR_CODE_URL};

mod toolkit;
pub use toolkit::{ToolkitConfig, DEFAULT_DEPLOYMENTS_DIR, DEFAULT_EXCLUDED_CHAINS};
