//! Capability interfaces for the two contracts the tooling talks to.
//!
//! Workflows and the dashboard only depend on these traits. [`evm::EvmClient`]
//! implements them against a JSON-RPC node, [`crate::tools::mock_ledger::MockLedger`]
//! implements them in memory.

use std::future::Future;

use alloy::primitives::{Address, TxHash, U256};
use anyhow::Result;

pub mod evm;

/// A submitted state-changing call.
///
/// Nothing about the transaction is durable until [`PendingTx::wait`] resolves.
pub trait PendingTx: Send {
    fn tx_hash(&self) -> TxHash;

    /// Blocks until the node reports the transaction as committed.
    /// A reverted transaction is an error.
    fn wait(self) -> impl Future<Output = Result<TxHash>> + Send;
}

/// Native currency reads against the remote node.
pub trait Ledger: Send + Sync {
    type Pending: PendingTx;

    fn native_balance(&self, account: Address) -> impl Future<Output = Result<U256>> + Send;
}

/// BEP-20 token surface.
pub trait TokenContract: Ledger {
    fn balance_of(&self, owner: Address) -> impl Future<Output = Result<U256>> + Send;

    fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> impl Future<Output = Result<U256>> + Send;

    fn approve(
        &self,
        spender: Address,
        amount: U256,
    ) -> impl Future<Output = Result<Self::Pending>> + Send;
}

/// Minting contract surface.
pub trait MinterContract: Ledger {
    fn is_mint_active(&self) -> impl Future<Output = Result<bool>> + Send;

    /// Tokens the contract would hand out for `payment` wei.
    fn calculate_tokens(&self, payment: U256) -> impl Future<Output = Result<U256>> + Send;

    /// Payable: `value` is attached as transferred native currency.
    fn mint(
        &self,
        proof: U256,
        recipient: Address,
        value: U256,
    ) -> impl Future<Output = Result<Self::Pending>> + Send;

    fn total_collected(&self) -> impl Future<Output = Result<U256>> + Send;

    fn hardcap(&self) -> impl Future<Output = Result<U256>> + Send;

    fn mint_enabled(&self) -> impl Future<Output = Result<bool>> + Send;

    fn claw_program(&self) -> impl Future<Output = Result<Address>> + Send;

    fn treasury(&self) -> impl Future<Output = Result<Address>> + Send;
}
