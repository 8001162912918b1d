/// OP mainnet constants.
pub mod optimism;

/// Sepolia testnet constants.
pub mod sepolia;

/// Local development chain constants.
pub mod localhost;
