//! Constants for local development chains.

/// Chain ID used by hardhat and anvil.
pub const CHAIN_ID: u64 = 31337;
