//! Constants for OP mainnet.

use crate::SciDeployment;
use alloy::primitives::{address, Address};

/// Chain ID for OP mainnet.
pub const CHAIN_ID: u64 = 10;

/// `L2CrossDomainMessenger` predeploy on OP-stack chains.
pub const L2_CROSS_DOMAIN_MESSENGER: Address =
    address!("0x4200000000000000000000000000000000000007");

/// `SciRegistry` on OP mainnet.
pub const SCI_REGISTRY: Address = address!("0xaDD75Aecd98f0ADAD899729c88BfED4f8951c02A");
/// `EnsRegistrar` on OP mainnet.
pub const ENS_REGISTRAR: Address = address!("0xd58d48185146343720df2C26FcD8D3C3734e22cf");
/// `SciRegistrar` on OP mainnet.
pub const SCI_REGISTRAR: Address = address!("0xC29e83AfEe01bDccA7f69fE1DfD7A61954dCE4d4");
/// `PublicListVerifier` on OP mainnet.
pub const PUBLIC_LIST_VERIFIER: Address = address!("0x83223D23E769CFE4b8bec8A32Eb148d0dbEc4dE5");
/// `SCI` implementation on OP mainnet.
pub const SCI_IMPLEMENTATION: Address = address!("0xe324A37594561b3Bfe3f535Aa7108224a703710F");
/// `TransparentUpgradeableProxy` for SCI on OP mainnet.
pub const SCI_PROXY: Address = address!("0x5018467c486534Bd15dfE88694Cd0Cbb27A55663");
/// `ProxyAdmin` for SCI on OP mainnet.
pub const PROXY_ADMIN: Address = address!("0xc0f4550909FF46204CE857d6557edE3c115093C0");

/// The published deployment on OP mainnet.
pub const DEPLOYMENT: SciDeployment = SciDeployment::new(
    CHAIN_ID,
    SCI_REGISTRY,
    ENS_REGISTRAR,
    SCI_REGISTRAR,
    PUBLIC_LIST_VERIFIER,
    SCI_IMPLEMENTATION,
    SCI_PROXY,
    PROXY_ADMIN,
);
