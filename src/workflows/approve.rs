//! Allowance Setter: lets the minting contract move the treasury's tokens.

use alloy::primitives::{Address, TxHash, U256};
use anyhow::{Context, Result};
use tracing::info;

use crate::{
    contracts::{PendingTx, TokenContract},
    model::format_token,
};

#[derive(Debug, Clone)]
pub struct ApproveRequest {
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// An allowance was already in place, nothing was sent.
    AlreadyApproved { allowance: U256 },
    Approved { tx_hash: TxHash, amount: U256 },
}

pub async fn run<T: TokenContract>(token: &T, request: &ApproveRequest) -> Result<ApproveOutcome> {
    let allowance = token
        .allowance(request.owner, request.spender)
        .await
        .context("reading current allowance")?;
    info!("Current allowance: {}", format_token(allowance));

    if allowance > U256::ZERO {
        info!("Already approved!");
        return Ok(ApproveOutcome::AlreadyApproved { allowance });
    }

    info!("Approving {} CLAWP...", format_token(request.amount));
    let pending = token
        .approve(request.spender, request.amount)
        .await
        .context("submitting approval")?;
    info!("TX: {}", pending.tx_hash());

    let tx_hash = pending.wait().await.context("confirming approval")?;

    Ok(ApproveOutcome::Approved {
        tx_hash,
        amount: request.amount,
    })
}
