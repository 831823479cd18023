//! RPC request and response types.
//!
//! All amounts are decimal strings on the wire.

use serde::{Deserialize, Serialize};

// ── Wallet ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BalanceRequest {
    pub wallet: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: String,
}

#[derive(Deserialize)]
pub struct TransactionsRequest {
    pub wallet: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionView>,
}

#[derive(Debug, Serialize)]
pub struct TransactionView {
    pub address: String,
    pub balance_change: BalanceChangeView,
    pub height: u64,
    pub time: u64,
    pub transaction_id: String,
}

/// Externally tagged on the wire: `{"Incoming": "30"}`.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub enum BalanceChangeView {
    Incoming(String),
    Outgoing(String),
}

#[derive(Deserialize)]
pub struct SendToAddressRequest {
    pub wallet: String,
    pub to_address: String,
    pub amount: String,
    /// View keys granted read access to the transaction. Accepted and
    /// passed through to the transaction builder; unused here.
    #[serde(default)]
    pub view_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SendToAddressResponse {
    pub transaction_id: String,
}

// ── Staking ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DepositStakeRequest {
    pub wallet: String,
    pub to_address: String,
    pub inputs: Vec<InputRef>,
}

#[derive(Deserialize)]
pub struct InputRef {
    pub id: String,
    pub index: u32,
}

#[derive(Debug, Serialize)]
pub struct DepositStakeResponse {
    pub transaction_id: String,
}

#[derive(Deserialize)]
pub struct UnbondStakeRequest {
    pub wallet: String,
    pub staking_address: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct UnbondStakeResponse {
    pub success: bool,
}

#[derive(Deserialize)]
pub struct WithdrawAllUnbondedStakeRequest {
    pub wallet: String,
    pub from_address: String,
    pub to_address: String,
    /// View keys granted read access; accepted and passed through.
    #[serde(default)]
    pub view_keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawAllUnbondedStakeResponse {
    pub withdrawn: String,
}

#[derive(Deserialize)]
pub struct StakingStateRequest {
    pub wallet: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct StakingStateResponse {
    pub address: String,
    pub bonded: String,
    pub unbonded: String,
    pub unbonded_from: u64,
    pub nonce: u64,
}
