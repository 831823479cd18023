//! Settlement service.
//!
//! One `WalletService` owns every piece of wallet-facing bookkeeping:
//! balances and history (balance ledger), spendable outputs (unspent
//! index), staking state (staking table), plus the injected fee policy and
//! clock/height oracle. Each public operation is one atomic unit: it locks
//! the keys it touches, stages every write into one store batch, and
//! commits the batch only when every step has succeeded.

use vesta_ledger::{BalanceChange, BalanceLedger, TransactionRecord};
use vesta_staking::{StakingState, StakingTable};
use vesta_store::{KvStore, WriteBatch};
use vesta_types::{sum_amounts, Address, AddressKind, Amount, TxId, WalletId};

use crate::fee::TxShape;
use crate::utxo::{UnspentIndex, UnspentOutput};
use crate::{Clock, FeePolicy, KeyedMutex, SettlementConfig, WalletError};

const RECEIVERS_KEYSPACE: &str = "receivers";
const ADDRESSES_KEYSPACE: &str = "addresses";

/// The wallet-facing settlement orchestrator.
pub struct WalletService<S: KvStore + Clone, F: FeePolicy, C: Clock> {
    store: S,
    ledger: BalanceLedger<S>,
    staking: StakingTable<S>,
    utxos: UnspentIndex<S>,
    fee_policy: F,
    clock: C,
    locks: KeyedMutex,
    config: SettlementConfig,
}

impl<S: KvStore + Clone, F: FeePolicy, C: Clock> WalletService<S, F, C> {
    pub fn new(store: S, fee_policy: F, clock: C, config: SettlementConfig) -> Self {
        Self {
            ledger: BalanceLedger::new(store.clone()),
            staking: StakingTable::new(store.clone()),
            utxos: UnspentIndex::new(store.clone()),
            store,
            fee_policy,
            clock,
            locks: KeyedMutex::new(),
            config,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Current balance; zero for an unseen wallet.
    pub fn balance(&self, wallet: &WalletId) -> Result<Amount, WalletError> {
        Ok(self.ledger.get_balance(wallet)?)
    }

    /// Full transaction history in append order.
    pub fn transactions(&self, wallet: &WalletId) -> Result<Vec<TransactionRecord>, WalletError> {
        Ok(self.ledger.list_transactions(wallet)?)
    }

    /// Staking state of an address; zero-value default when unseen.
    pub fn staking_state(&self, address: &Address) -> Result<StakingState, WalletError> {
        if address.kind() != AddressKind::Staking {
            return Err(WalletError::InvalidInput(format!(
                "{address} is not a staking address"
            )));
        }
        Ok(self.staking.state(address)?)
    }

    /// Spendable outputs of a wallet.
    pub fn unspent_outputs(&self, wallet: &WalletId) -> Result<Vec<UnspentOutput>, WalletError> {
        self.utxos.outputs(wallet)
    }

    // ── Address registry ────────────────────────────────────────────────

    /// Bind a transfer address to a wallet so incoming legs credit it.
    ///
    /// The first registered address doubles as the wallet's change address.
    pub fn register_address(
        &self,
        wallet: &WalletId,
        address: &Address,
    ) -> Result<(), WalletError> {
        if address.kind() != AddressKind::Transfer {
            return Err(WalletError::InvalidInput(format!(
                "{address} is not a transfer address"
            )));
        }
        // The binding is keyed by the address, so the address key must be in
        // the lock set; otherwise two wallets could claim it concurrently.
        self.locks.with_locked(&[wallet.as_str(), address.as_str()], || {
            if let Some(owner) = self.resolve_wallet(address)? {
                if owner != *wallet {
                    return Err(WalletError::InvalidInput(format!(
                        "{address} is already bound to another wallet"
                    )));
                }
                return Ok(());
            }

            let mut batch = self.store.write_batch()?;
            batch.put(
                RECEIVERS_KEYSPACE,
                address.as_str().as_bytes(),
                wallet.as_str().as_bytes(),
            )?;
            let mut addresses = self.wallet_addresses(wallet)?;
            addresses.push(address.clone());
            batch.put(
                ADDRESSES_KEYSPACE,
                wallet.as_str().as_bytes(),
                &bincode::serialize(&addresses)
                    .map_err(|e| WalletError::Serialization(e.to_string()))?,
            )?;
            batch.commit()?;
            Ok(())
        })
    }

    /// The wallet owning an address, if any is registered.
    pub fn resolve_wallet(&self, address: &Address) -> Result<Option<WalletId>, WalletError> {
        match self.store.get(RECEIVERS_KEYSPACE, address.as_str().as_bytes())? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(|name| Some(WalletId::new(name)))
                .map_err(|_| WalletError::Serialization("wallet name is not UTF-8".into())),
        }
    }

    /// Transfer addresses registered for a wallet, in registration order.
    pub fn wallet_addresses(&self, wallet: &WalletId) -> Result<Vec<Address>, WalletError> {
        match self.store.get(ADDRESSES_KEYSPACE, wallet.as_str().as_bytes())? {
            None => Ok(Vec::new()),
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| WalletError::Serialization(e.to_string())),
        }
    }

    /// The wallet's change address: its first registered transfer address.
    /// A wallet exists once it has registered one; operating on behalf of a
    /// wallet that never did is `NotFound`.
    fn change_address(&self, wallet: &WalletId) -> Result<Address, WalletError> {
        self.wallet_addresses(wallet)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                WalletError::NotFound(format!("wallet {wallet} has no registered address"))
            })
    }

    // ── Settlement ──────────────────────────────────────────────────────

    /// Credit a confirmed incoming transfer to a wallet.
    ///
    /// Called by the chain-sync collaborator when it pockets an incoming
    /// output, and by tests to seed balances. Appends one `Incoming`
    /// record and adds one spendable output.
    pub fn credit_incoming(
        &self,
        wallet: &WalletId,
        source: &Address,
        amount: Amount,
        transaction_id: TxId,
    ) -> Result<(), WalletError> {
        self.locks.with_locked(&[wallet.as_str()], || {
            let mut batch = self.store.write_batch()?;
            self.ledger.apply(
                &mut batch,
                wallet,
                BalanceChange::Incoming(amount),
                source,
                self.clock.height(),
                self.clock.now(),
                transaction_id,
            )?;
            self.utxos.add(
                &mut batch,
                wallet,
                UnspentOutput {
                    id: transaction_id,
                    index: 0,
                    value: amount,
                },
            )?;
            batch.commit()?;
            Ok(())
        })
    }

    /// Pay `amount` from `sender` to `destination` as one atomic unit.
    ///
    /// Spends the sender's full set of unspent outputs and returns change,
    /// so the sender's history gains exactly two records: an `Outgoing`
    /// entry for the total inputs consumed and an `Incoming` entry for the
    /// change. A destination registered to a wallet gains one `Incoming`
    /// record; a staking destination additionally bonds `amount`.
    pub fn send(
        &self,
        sender: &WalletId,
        destination: &Address,
        amount: Amount,
    ) -> Result<TxId, WalletError> {
        loop {
            let receiver = self.resolve_wallet(destination)?;

            let mut keys = vec![sender.as_str(), destination.as_str()];
            if let Some(ref receiver) = receiver {
                keys.push(receiver.as_str());
            }
            let settled = self.locks.with_locked(&keys, || {
                // A registration can land between the resolve above and
                // taking the locks; restart so the receiver's key is in the
                // lock set. Registration holds the address key, so once the
                // locks are held the resolution cannot change again.
                if self.resolve_wallet(destination)? != receiver {
                    return Ok(None);
                }
                self.settle_transfer(sender, destination, amount, receiver.as_ref())
                    .map(Some)
            })?;
            if let Some(transaction_id) = settled {
                return Ok(transaction_id);
            }
        }
    }

    fn settle_transfer(
        &self,
        sender: &WalletId,
        destination: &Address,
        amount: Amount,
        receiver: Option<&WalletId>,
    ) -> Result<TxId, WalletError> {
        let change_address = self.change_address(sender)?;
        let mut batch = self.store.write_batch()?;

        let inputs = self.utxos.take_all(&mut batch, sender)?;
        let total = sum_amounts(inputs.iter().map(|o| o.value))
            .map_err(|_| WalletError::InsufficientBalance)?;
        let fee = self.fee_policy.compute_fee(&TxShape {
            inputs: inputs.len(),
            outputs: 2,
        });
        let needed = amount
            .checked_add(fee)
            .ok_or(WalletError::InsufficientBalance)?;
        let change = total
            .checked_sub(needed)
            .ok_or(WalletError::InsufficientBalance)?;

        let height = self.clock.height();
        let time = self.clock.now();
        let transaction_id = transfer_tx_id(sender, destination, amount, &inputs);

        // Sender legs: total spent, then change returned.
        self.ledger.apply(
            &mut batch,
            sender,
            BalanceChange::Outgoing(total),
            destination,
            height,
            time,
            transaction_id,
        )?;
        self.ledger.apply(
            &mut batch,
            sender,
            BalanceChange::Incoming(change),
            &change_address,
            height,
            time,
            transaction_id,
        )?;
        if !change.is_zero() {
            self.utxos.add(
                &mut batch,
                sender,
                UnspentOutput {
                    id: transaction_id,
                    index: 1,
                    value: change,
                },
            )?;
        }

        match destination.kind() {
            AddressKind::Staking => {
                self.staking.deposit(&mut batch, destination, amount)?;
            }
            AddressKind::Transfer => {
                if let Some(receiver) = receiver {
                    self.ledger.apply(
                        &mut batch,
                        receiver,
                        BalanceChange::Incoming(amount),
                        &change_address,
                        height,
                        time,
                        transaction_id,
                    )?;
                    if !amount.is_zero() {
                        self.utxos.add(
                            &mut batch,
                            receiver,
                            UnspentOutput {
                                id: transaction_id,
                                index: 0,
                                value: amount,
                            },
                        )?;
                    }
                }
            }
        }

        batch.commit()?;
        tracing::info!(
            sender = %sender,
            destination = %destination,
            amount = %amount,
            fee = %fee,
            tx = %transaction_id,
            "settled transfer"
        );
        Ok(transaction_id)
    }

    /// Bond the value of explicitly referenced outputs to a staking address.
    ///
    /// The referenced outputs are consumed in full; the bonded amount is
    /// their sum minus the fee.
    pub fn deposit_stake(
        &self,
        wallet: &WalletId,
        staking_address: &Address,
        inputs: &[(TxId, u32)],
    ) -> Result<TxId, WalletError> {
        if staking_address.kind() != AddressKind::Staking {
            return Err(WalletError::InvalidInput(format!(
                "{staking_address} is not a staking address"
            )));
        }
        self.locks
            .with_locked(&[wallet.as_str(), staking_address.as_str()], || {
                let mut batch = self.store.write_batch()?;

                let consumed = self.utxos.take_refs(&mut batch, wallet, inputs)?;
                let total = sum_amounts(consumed.iter().map(|o| o.value))
                    .map_err(|_| WalletError::InsufficientBalance)?;
                let fee = self.fee_policy.compute_fee(&TxShape {
                    inputs: consumed.len(),
                    outputs: 0,
                });
                let bonded = total
                    .checked_sub(fee)
                    .filter(|b| !b.is_zero())
                    .ok_or(WalletError::InsufficientBalance)?;

                let height = self.clock.height();
                let time = self.clock.now();
                let transaction_id = transfer_tx_id(wallet, staking_address, bonded, &consumed);

                self.ledger.apply(
                    &mut batch,
                    wallet,
                    BalanceChange::Outgoing(total),
                    staking_address,
                    height,
                    time,
                    transaction_id,
                )?;
                self.staking.deposit(&mut batch, staking_address, bonded)?;

                batch.commit()?;
                tracing::info!(
                    wallet = %wallet,
                    address = %staking_address,
                    bonded = %bonded,
                    fee = %fee,
                    tx = %transaction_id,
                    "deposited stake"
                );
                Ok(transaction_id)
            })
    }

    /// Move `amount` of bonded stake to unbonded, restarting maturity.
    pub fn unbond_stake(
        &self,
        wallet: &WalletId,
        staking_address: &Address,
        amount: Amount,
    ) -> Result<(), WalletError> {
        if staking_address.kind() != AddressKind::Staking {
            return Err(WalletError::InvalidInput(format!(
                "{staking_address} is not a staking address"
            )));
        }
        self.locks.with_locked(&[staking_address.as_str()], || {
            let mut batch = self.store.write_batch()?;
            self.staking.unbond(
                &mut batch,
                staking_address,
                amount,
                self.clock.now(),
                self.config.unbonding_period_secs,
            )?;
            batch.commit()?;
            tracing::info!(
                wallet = %wallet,
                address = %staking_address,
                amount = %amount,
                "unbonded stake"
            );
            Ok(())
        })
    }

    /// Withdraw the entire matured unbonded amount to `destination`.
    ///
    /// Returns the amount withdrawn; zero when nothing was unbonded.
    pub fn withdraw_unbonded(
        &self,
        wallet: &WalletId,
        staking_address: &Address,
        destination: &Address,
    ) -> Result<Amount, WalletError> {
        if staking_address.kind() != AddressKind::Staking {
            return Err(WalletError::InvalidInput(format!(
                "{staking_address} is not a staking address"
            )));
        }
        // Withdrawn value must land on a transfer address; a staking
        // destination would debit the stake and credit nothing.
        if destination.kind() != AddressKind::Transfer {
            return Err(WalletError::InvalidInput(format!(
                "{destination} is not a transfer address"
            )));
        }
        loop {
            let receiver = self.resolve_wallet(destination)?;

            let mut keys = vec![staking_address.as_str(), destination.as_str()];
            if let Some(ref receiver) = receiver {
                keys.push(receiver.as_str());
            }
            let withdrawn = self.locks.with_locked(&keys, || {
                if self.resolve_wallet(destination)? != receiver {
                    return Ok(None);
                }
                self.settle_withdrawal(wallet, staking_address, destination, receiver.as_ref())
                    .map(Some)
            })?;
            if let Some(withdrawn) = withdrawn {
                return Ok(withdrawn);
            }
        }
    }

    fn settle_withdrawal(
        &self,
        wallet: &WalletId,
        staking_address: &Address,
        destination: &Address,
        receiver: Option<&WalletId>,
    ) -> Result<Amount, WalletError> {
        let mut batch = self.store.write_batch()?;

        let withdrawn = self.staking.withdraw(&mut batch, staking_address, self.clock.now())?;
        if withdrawn.is_zero() {
            return Ok(Amount::ZERO);
        }

        let height = self.clock.height();
        let time = self.clock.now();
        let transaction_id = transfer_tx_id(wallet, destination, withdrawn, &[]);

        if let Some(receiver) = receiver {
            self.ledger.apply(
                &mut batch,
                receiver,
                BalanceChange::Incoming(withdrawn),
                staking_address,
                height,
                time,
                transaction_id,
            )?;
            self.utxos.add(
                &mut batch,
                receiver,
                UnspentOutput {
                    id: transaction_id,
                    index: 0,
                    value: withdrawn,
                },
            )?;
        }

        batch.commit()?;
        tracing::info!(
            wallet = %wallet,
            address = %staking_address,
            destination = %destination,
            amount = %withdrawn,
            "withdrew unbonded stake"
        );
        Ok(withdrawn)
    }
}

/// Derive the settling transaction id from the transfer parameters and the
/// consumed outputs. Consumed outputs make retries distinguishable: once an
/// output is spent, no later transfer can reference it again.
fn transfer_tx_id(
    sender: &WalletId,
    destination: &Address,
    amount: Amount,
    inputs: &[UnspentOutput],
) -> TxId {
    let amount_bytes = amount.raw().to_le_bytes();
    let mut parts: Vec<Vec<u8>> = vec![
        sender.as_str().as_bytes().to_vec(),
        destination.as_str().as_bytes().to_vec(),
        amount_bytes.to_vec(),
    ];
    for input in inputs {
        let mut part = input.id.as_bytes().to_vec();
        part.extend_from_slice(&input.index.to_le_bytes());
        parts.push(part);
    }
    TxId::digest(parts.iter().map(|p| p.as_slice()))
}
