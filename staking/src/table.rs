//! Store-backed staking table with guarded transitions.

use vesta_store::{KvStore, WriteBatch};
use vesta_types::{Address, Amount, Timestamp};

use crate::{StakingError, StakingState};

const STAKING_KEYSPACE: &str = "staking";

/// Staking state per staking address, persisted through the key-value store.
///
/// Every mutating operation stages into a caller-owned write batch, so a
/// staking transition commits atomically with the balance legs of the same
/// settlement. Failed guards stage nothing.
#[derive(Clone)]
pub struct StakingTable<S: KvStore> {
    store: S,
}

impl<S: KvStore> StakingTable<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Committed state of an address; zero-value default when unseen.
    pub fn state(&self, address: &Address) -> Result<StakingState, StakingError> {
        match self.store.get(STAKING_KEYSPACE, address.as_str().as_bytes())? {
            None => Ok(StakingState::default_for(address.clone())),
            Some(bytes) => decode_state(&bytes),
        }
    }

    /// Increase the bonded amount. The funding debit is the caller's
    /// responsibility and must be staged into the same batch.
    pub fn deposit(
        &self,
        batch: &mut S::Batch<'_>,
        address: &Address,
        amount: Amount,
    ) -> Result<(), StakingError> {
        if amount.is_zero() {
            return Err(StakingError::InvalidInput(
                "deposit amount must be positive".into(),
            ));
        }
        let mut state = self.load(batch, address)?;
        state.bonded = state
            .bonded
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        state.nonce += 1;
        self.save(batch, &state)?;

        tracing::debug!(address = %address, amount = %amount, nonce = state.nonce, "deposited stake");
        Ok(())
    }

    /// Move `amount` from bonded to unbonded and restart the maturity clock.
    pub fn unbond(
        &self,
        batch: &mut S::Batch<'_>,
        address: &Address,
        amount: Amount,
        now: Timestamp,
        unbonding_period_secs: u64,
    ) -> Result<(), StakingError> {
        if amount.is_zero() {
            return Err(StakingError::InvalidInput(
                "unbond amount must be positive".into(),
            ));
        }
        let mut state = self.load(batch, address)?;
        state.bonded =
            state
                .bonded
                .checked_sub(amount)
                .ok_or(StakingError::InsufficientBondedAmount {
                    needed: amount.raw(),
                    bonded: state.bonded.raw(),
                })?;
        state.unbonded = state
            .unbonded
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        state.unbonded_from = now.saturating_add_secs(unbonding_period_secs);
        state.nonce += 1;
        self.save(batch, &state)?;

        tracing::debug!(
            address = %address,
            amount = %amount,
            unbonded_from = %state.unbonded_from,
            nonce = state.nonce,
            "unbonded stake"
        );
        Ok(())
    }

    /// Release the entire matured unbonded amount, returning it so the
    /// caller can credit the destination wallet in the same batch.
    ///
    /// A zero unbonded amount is a no-op that returns zero and leaves the
    /// state (nonce included) untouched.
    pub fn withdraw(
        &self,
        batch: &mut S::Batch<'_>,
        address: &Address,
        now: Timestamp,
    ) -> Result<Amount, StakingError> {
        let mut state = self.load(batch, address)?;
        if state.unbonded.is_zero() {
            return Ok(Amount::ZERO);
        }
        if !state.unbonded_from.is_reached(now) {
            return Err(StakingError::NotMatured {
                unbonded_from: state.unbonded_from.as_secs(),
                now: now.as_secs(),
            });
        }
        let withdrawn = state.unbonded;
        state.unbonded = Amount::ZERO;
        state.nonce += 1;
        self.save(batch, &state)?;

        tracing::debug!(address = %address, amount = %withdrawn, nonce = state.nonce, "withdrew unbonded stake");
        Ok(withdrawn)
    }

    fn load(
        &self,
        batch: &S::Batch<'_>,
        address: &Address,
    ) -> Result<StakingState, StakingError> {
        match batch.get(STAKING_KEYSPACE, address.as_str().as_bytes())? {
            None => Ok(StakingState::default_for(address.clone())),
            Some(bytes) => decode_state(&bytes),
        }
    }

    fn save(&self, batch: &mut S::Batch<'_>, state: &StakingState) -> Result<(), StakingError> {
        let bytes =
            bincode::serialize(state).map_err(|e| StakingError::Serialization(e.to_string()))?;
        batch.put(STAKING_KEYSPACE, state.address.as_str().as_bytes(), &bytes)?;
        Ok(())
    }
}

fn decode_state(bytes: &[u8]) -> Result<StakingState, StakingError> {
    bincode::deserialize(bytes).map_err(|e| StakingError::Serialization(e.to_string()))
}
