use alloy::{
    primitives::{Address, B256},
    signers::local::PrivateKeySigner,
};

/// Index of the deploying account in [`test_accounts`].
pub const DEPLOYER: usize = 0;

/// Index of the bridge relayer in [`test_accounts`].
pub const RELAYER: usize = 9;

/// Make a wallet with a deterministic keypair.
pub fn make_wallet(i: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(i)).unwrap()
}

/// Ten deterministic accounts, backed by the keys `0x0101..`, `0x0202..`, ...
pub fn test_accounts() -> Vec<Address> {
    (1..=10).map(|i| make_wallet(i).address()).collect()
}

/// The account at `index` of [`test_accounts`].
pub fn test_account(index: usize) -> Address {
    test_accounts()[index]
}
