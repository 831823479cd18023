//! Transfer settlement for the Vesta subsystem.
//!
//! Orchestrates wallet-to-address payments as single atomic units: input
//! selection, fee computation, balance ledger legs, unspent-output
//! bookkeeping, and the staking transition when the destination is a
//! staking address. All writes of one settlement land in one store batch;
//! operations on the same wallet or staking address are serialized by a
//! per-key lock table.

pub mod clock;
pub mod config;
pub mod error;
pub mod fee;
pub mod locks;
pub mod service;
pub mod utxo;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SettlementConfig;
pub use error::WalletError;
pub use fee::{FeePolicy, LinearFeePolicy, TxShape, ZeroFeePolicy};
pub use locks::KeyedMutex;
pub use service::WalletService;
pub use utxo::{UnspentIndex, UnspentOutput};
