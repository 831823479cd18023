//! Wallet and staking RPC endpoints.

use std::sync::Arc;

use vesta_ledger::BalanceChange;
use vesta_store::KvStore;
use vesta_types::{Address, Amount, TxId, WalletId};
use vesta_wallet::{Clock, FeePolicy, WalletService};

use crate::error::RpcError;
use crate::handlers::*;

/// RPC endpoint implementation, generic over the settlement service it
/// fronts. Validates and parses the wire types, delegates to the service,
/// and renders results back to wire form.
pub struct WalletRpc<S: KvStore + Clone, F: FeePolicy, C: Clock> {
    service: Arc<WalletService<S, F, C>>,
}

impl<S: KvStore + Clone, F: FeePolicy, C: Clock> WalletRpc<S, F, C> {
    pub fn new(service: Arc<WalletService<S, F, C>>) -> Self {
        Self { service }
    }

    /// The settlement service behind this endpoint.
    pub fn service(&self) -> &Arc<WalletService<S, F, C>> {
        &self.service
    }

    pub fn balance(&self, req: BalanceRequest) -> Result<BalanceResponse, RpcError> {
        let wallet = parse_wallet(&req.wallet)?;
        let balance = self.service.balance(&wallet)?;
        Ok(BalanceResponse {
            balance: balance.to_decimal_string(),
        })
    }

    pub fn transactions(&self, req: TransactionsRequest) -> Result<TransactionsResponse, RpcError> {
        let wallet = parse_wallet(&req.wallet)?;
        let transactions = self
            .service
            .transactions(&wallet)?
            .into_iter()
            .map(|record| TransactionView {
                address: record.address.as_str().to_string(),
                balance_change: match record.balance_change {
                    BalanceChange::Incoming(a) => {
                        BalanceChangeView::Incoming(a.to_decimal_string())
                    }
                    BalanceChange::Outgoing(a) => {
                        BalanceChangeView::Outgoing(a.to_decimal_string())
                    }
                },
                height: record.height,
                time: record.time.as_secs(),
                transaction_id: record.transaction_id.to_string(),
            })
            .collect();
        Ok(TransactionsResponse { transactions })
    }

    pub fn send_to_address(
        &self,
        req: SendToAddressRequest,
    ) -> Result<SendToAddressResponse, RpcError> {
        let wallet = parse_wallet(&req.wallet)?;
        let destination = parse_address(&req.to_address)?;
        let amount = parse_amount(&req.amount)?;
        tracing::debug!(wallet = %wallet, to = %destination, amount = %amount, "sendToAddress");
        let transaction_id = self.service.send(&wallet, &destination, amount)?;
        Ok(SendToAddressResponse {
            transaction_id: transaction_id.to_string(),
        })
    }

    pub fn deposit_stake(
        &self,
        req: DepositStakeRequest,
    ) -> Result<DepositStakeResponse, RpcError> {
        let wallet = parse_wallet(&req.wallet)?;
        let destination = parse_address(&req.to_address)?;
        let inputs = req
            .inputs
            .iter()
            .map(|r| Ok((parse_tx_id(&r.id)?, r.index)))
            .collect::<Result<Vec<_>, RpcError>>()?;
        tracing::debug!(wallet = %wallet, to = %destination, inputs = inputs.len(), "depositStake");
        let transaction_id = self.service.deposit_stake(&wallet, &destination, &inputs)?;
        Ok(DepositStakeResponse {
            transaction_id: transaction_id.to_string(),
        })
    }

    pub fn unbond_stake(&self, req: UnbondStakeRequest) -> Result<UnbondStakeResponse, RpcError> {
        let wallet = parse_wallet(&req.wallet)?;
        let address = parse_address(&req.staking_address)?;
        let amount = parse_amount(&req.amount)?;
        self.service.unbond_stake(&wallet, &address, amount)?;
        Ok(UnbondStakeResponse { success: true })
    }

    pub fn withdraw_all_unbonded_stake(
        &self,
        req: WithdrawAllUnbondedStakeRequest,
    ) -> Result<WithdrawAllUnbondedStakeResponse, RpcError> {
        let wallet = parse_wallet(&req.wallet)?;
        let from = parse_address(&req.from_address)?;
        let to = parse_address(&req.to_address)?;
        let withdrawn = self.service.withdraw_unbonded(&wallet, &from, &to)?;
        Ok(WithdrawAllUnbondedStakeResponse {
            withdrawn: withdrawn.to_decimal_string(),
        })
    }

    pub fn staking_state(&self, req: StakingStateRequest) -> Result<StakingStateResponse, RpcError> {
        parse_wallet(&req.wallet)?;
        let address = parse_address(&req.address)?;
        let state = self.service.staking_state(&address)?;
        Ok(StakingStateResponse {
            address: state.address.as_str().to_string(),
            bonded: state.bonded.to_decimal_string(),
            unbonded: state.unbonded.to_decimal_string(),
            unbonded_from: state.unbonded_from.as_secs(),
            nonce: state.nonce,
        })
    }
}

fn parse_wallet(name: &str) -> Result<WalletId, RpcError> {
    if name.is_empty() {
        return Err(RpcError::InvalidRequest("wallet name is empty".into()));
    }
    Ok(WalletId::new(name))
}

fn parse_address(s: &str) -> Result<Address, RpcError> {
    s.parse()
        .map_err(|e: vesta_types::AddressError| RpcError::InvalidRequest(e.to_string()))
}

fn parse_amount(s: &str) -> Result<Amount, RpcError> {
    s.parse()
        .map_err(|_| RpcError::InvalidRequest(format!("cannot parse amount {s:?}")))
}

fn parse_tx_id(s: &str) -> Result<TxId, RpcError> {
    TxId::from_hex(s).ok_or_else(|| RpcError::InvalidRequest(format!("malformed tx id {s:?}")))
}
