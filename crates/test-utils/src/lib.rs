//! Fixtures shared by SCI tests: deterministic accounts, an ENS registry
//! set up like a local node, and a two-chain deployment wired through a
//! messenger pair.

pub mod ens;
pub mod harness;
pub mod tracing;
pub mod users;

pub use ens::EnsFixture;
pub use harness::TwoChainHarness;
pub use users::{make_wallet, test_account, test_accounts};
