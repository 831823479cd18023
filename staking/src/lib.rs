//! Staking state machine for the Vesta subsystem.
//!
//! Tracks per-staking-address bonded and unbonded amounts, the maturity
//! timestamp for unbonded stake, and a nonce that increments on every
//! successful state-mutating operation. Bonded and unbonded are two
//! independent non-negative accumulators rather than a discrete state tag,
//! because unbonding and withdrawal operate on amounts.

pub mod error;
pub mod state;
pub mod table;

pub use error::StakingError;
pub use state::StakingState;
pub use table::StakingTable;
