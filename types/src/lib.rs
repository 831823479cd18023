//! Fundamental types for the Vesta wallet and staking subsystem.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: amounts, addresses, wallet identifiers, transaction ids, and
//! timestamps.

pub mod address;
pub mod amount;
pub mod time;
pub mod tx;
pub mod wallet;

pub use address::{Address, AddressError, AddressKind};
pub use amount::{sum_amounts, Amount, AmountError};
pub use time::Timestamp;
pub use tx::TxId;
pub use wallet::WalletId;
