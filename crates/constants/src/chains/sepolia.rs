//! Constants for the Sepolia testnet.

use crate::SciDeployment;
use alloy::primitives::{address, Address};

/// Chain ID for Sepolia.
pub const CHAIN_ID: u64 = 11155111;

/// ENS registry on Sepolia.
pub const ENS_REGISTRY: Address = address!("0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// `SciRegistry` on Sepolia.
pub const SCI_REGISTRY: Address = address!("0xD84Dc714938fc3b7E9Ef2674f6cD3FdA49576FBf");
/// `EnsRegistrar` on Sepolia.
pub const ENS_REGISTRAR: Address = address!("0x9a33cD737a74939830e7a0bF6B3bFd67219d61E6");
/// `SciRegistrar` on Sepolia.
pub const SCI_REGISTRAR: Address = address!("0x64349bD9Ba62BaDCF92cAfbD08A337428360cE24");
/// `PublicListVerifier` on Sepolia.
pub const PUBLIC_LIST_VERIFIER: Address = address!("0x2E242894dC1580204037740f54984FA1d38931FD");
/// `SCI` implementation on Sepolia.
pub const SCI_IMPLEMENTATION: Address = address!("0x79A2C5A82E3d94513a0e9c3aC409a546D79b27b1");
/// `TransparentUpgradeableProxy` for SCI on Sepolia.
pub const SCI_PROXY: Address = address!("0xE9debDF7E1223dAD6F2109F2A648DCCf050a56e0");
/// `ProxyAdmin` for SCI on Sepolia.
pub const PROXY_ADMIN: Address = address!("0x4399350BBC86F1CB8F605cc6816507F96428656e");

/// The published deployment on Sepolia.
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
