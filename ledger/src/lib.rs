//! Balance ledger for the Vesta subsystem.
//!
//! Maintains one balance per wallet and an append-only transaction history,
//! with the invariant that a wallet's balance always equals the sum of its
//! `Incoming` records minus the sum of its `Outgoing` records.
//!
//! All mutation goes through [`BalanceLedger::apply`], which stages into a
//! store write batch; callers own the batch and decide when the settlement
//! commits as a whole.

pub mod change;
pub mod error;
pub mod ledger;
pub mod record;

pub use change::BalanceChange;
pub use error::LedgerError;
pub use ledger::BalanceLedger;
pub use record::TransactionRecord;
