//! Mint Executor: pays the minting contract and reports what the recipient got.
//!
//! The balance and "mint active" checks are client-side guards only. State can
//! change between them and the submission; the contract has the final word.

use alloy::primitives::{Address, TxHash, U256};
use anyhow::{Context, Result};
use derive_more::Display;
use tracing::info;

use crate::{
    contracts::{MinterContract, PendingTx, TokenContract},
    model::format_token,
};

#[derive(Debug, Clone)]
pub struct MintRequest {
    pub payer: Address,
    pub recipient: Address,
    pub payment: U256,
    pub proof: U256,
}

/// Why the workflow stopped before submitting anything.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Preflight {
    #[display("Insufficient BNB balance ({} < {})", format_token(*balance), format_token(*required))]
    InsufficientBalance { balance: U256, required: U256 },
    #[display("Mint is not active")]
    MintInactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub tx_hash: TxHash,
    /// What `calculateTokens` predicted before submission.
    pub expected_tokens: U256,
    /// Recipient token balance read after the transaction was confirmed.
    pub recipient_balance: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintOutcome {
    Rejected(Preflight),
    Minted(MintReceipt),
}

pub async fn run<C>(chain: &C, request: &MintRequest) -> Result<MintOutcome>
where
    C: MinterContract + TokenContract,
{
    let balance = chain
        .native_balance(request.payer)
        .await
        .context("reading payer balance")?;
    info!("Wallet BNB balance: {}", format_token(balance));

    if balance < request.payment {
        return Ok(MintOutcome::Rejected(Preflight::InsufficientBalance {
            balance,
            required: request.payment,
        }));
    }

    let active = chain
        .is_mint_active()
        .await
        .context("reading mint status")?;
    info!("Mint active: {active}");

    if !active {
        return Ok(MintOutcome::Rejected(Preflight::MintInactive));
    }

    let expected_tokens = chain
        .calculate_tokens(request.payment)
        .await
        .context("estimating minted tokens")?;
    info!("Expected CLAWP: {}", format_token(expected_tokens));
    info!("Agent proof: {}", request.proof);

    info!("Executing mint...");
    let pending = chain
        .mint(request.proof, request.recipient, request.payment)
        .await
        .context("submitting mint")?;
    info!("Transaction hash: {}", pending.tx_hash());
    info!("Waiting for confirmation...");

    let tx_hash = pending.wait().await.context("confirming mint")?;

    let recipient_balance = chain
        .balance_of(request.recipient)
        .await
        .context("reading recipient balance")?;

    Ok(MintOutcome::Minted(MintReceipt {
        tx_hash,
        expected_tokens,
        recipient_balance,
    }))
}
