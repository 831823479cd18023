//! RPC-facing service layer for the Vesta subsystem.
//!
//! Provides endpoints for:
//! - Wallet balance and transaction history
//! - Sending value to transfer or staking addresses
//! - Staking deposits, unbonding, and withdrawal
//! - Staking state queries
//!
//! Amounts cross this boundary as decimal strings; internally everything
//! stays in raw integer units. The transport (HTTP, socket, ...) sits above
//! this crate and only marshals the request/response types in
//! [`handlers`].

pub mod error;
pub mod handlers;
pub mod wallet_rpc;

pub use error::RpcError;
pub use wallet_rpc::WalletRpc;
