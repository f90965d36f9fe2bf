//! In-memory ledger implementing every contract capability.
//!
//! Clones share state, so a test can hand one clone to a workflow and inspect
//! the recorded calls through another.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use alloy::primitives::{Address, TxHash, U256};
use anyhow::{anyhow, bail, Result};

use crate::contracts::{Ledger, MinterContract, PendingTx, TokenContract};

/// Every remote call the mock served, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    NativeBalance(Address),
    BalanceOf(Address),
    Allowance {
        owner: Address,
        spender: Address,
    },
    Approve {
        spender: Address,
        amount: U256,
    },
    IsMintActive,
    CalculateTokens(U256),
    Mint {
        proof: U256,
        recipient: Address,
        value: U256,
    },
    TotalCollected,
    Hardcap,
    MintEnabled,
    ClawProgram,
    Treasury,
    Wait(TxHash),
}

#[derive(Debug, Clone)]
enum Effect {
    Approve {
        owner: Address,
        spender: Address,
        amount: U256,
    },
    Mint {
        payer: Address,
        recipient: Address,
        value: U256,
    },
}

#[derive(Debug, Default)]
struct MockState {
    native_balances: HashMap<Address, U256>,
    token_balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    mint_active: bool,
    mint_enabled: bool,
    tokens_per_native: U256,
    collected: U256,
    hardcap: U256,
    claw_program: Address,
    treasury: Address,
    failing_reads: bool,
    failing_balances: bool,
    hanging_reads: bool,
    reject_submissions: bool,
    revert_on_wait: bool,
    pending: HashMap<TxHash, Effect>,
    next_tx: u8,
    calls: Vec<LedgerCall>,
}

#[derive(Debug, Clone)]
pub struct MockLedger {
    sender: Address,
    state: Arc<Mutex<MockState>>,
}

impl MockLedger {
    /// A ledger where transactions are sent from `sender`. Minting starts
    /// active with a rate of one token per wei.
    pub fn new(sender: Address) -> Self {
        let state = MockState {
            mint_active: true,
            mint_enabled: true,
            tokens_per_native: U256::from(1u8),
            ..Default::default()
        };
        Self {
            sender,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only happens after a panicking test thread.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_native_balance(self, account: Address, amount: U256) -> Self {
        self.state().native_balances.insert(account, amount);
        self
    }

    pub fn with_token_balance(self, account: Address, amount: U256) -> Self {
        self.state().token_balances.insert(account, amount);
        self
    }

    pub fn with_allowance(self, owner: Address, spender: Address, amount: U256) -> Self {
        self.state().allowances.insert((owner, spender), amount);
        self
    }

    pub fn with_mint_active(self, active: bool) -> Self {
        self.state().mint_active = active;
        self
    }

    pub fn with_mint_enabled(self, enabled: bool) -> Self {
        self.state().mint_enabled = enabled;
        self
    }

    pub fn with_tokens_per_native(self, rate: U256) -> Self {
        self.state().tokens_per_native = rate;
        self
    }

    pub fn with_progress(self, collected: U256, hardcap: U256) -> Self {
        {
            let mut state = self.state();
            state.collected = collected;
            state.hardcap = hardcap;
        }
        self
    }

    pub fn with_roles(self, claw_program: Address, treasury: Address) -> Self {
        {
            let mut state = self.state();
            state.claw_program = claw_program;
            state.treasury = treasury;
        }
        self
    }

    /// Every read fails as if the node were unreachable.
    pub fn set_failing_reads(&self, failing: bool) {
        self.state().failing_reads = failing;
    }

    /// Only the account balance reads fail; minter reads keep working.
    pub fn set_failing_balances(&self, failing: bool) {
        self.state().failing_balances = failing;
    }

    /// Every read stays pending forever, as with a node that stopped answering.
    pub fn set_hanging_reads(&self, hanging: bool) {
        self.state().hanging_reads = hanging;
    }

    /// Submissions are refused before a hash is handed out.
    pub fn set_reject_submissions(&self, reject: bool) {
        self.state().reject_submissions = reject;
    }

    /// Submissions are accepted but revert once waited on.
    pub fn set_revert_on_wait(&self, revert: bool) {
        self.state().revert_on_wait = revert;
    }

    pub fn set_collected(&self, collected: U256) {
        self.state().collected = collected;
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.state().calls.clone()
    }

    pub fn approvals(&self) -> Vec<LedgerCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, LedgerCall::Approve { .. }))
            .collect()
    }

    pub fn mints(&self) -> Vec<LedgerCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, LedgerCall::Mint { .. }))
            .collect()
    }

    async fn read<T>(&self, call: LedgerCall, f: impl FnOnce(&MockState) -> T) -> Result<T> {
        let hanging = self.state().hanging_reads;
        if hanging {
            std::future::pending::<()>().await;
        }

        let mut state = self.state();
        let balance_read = matches!(
            call,
            LedgerCall::NativeBalance(_) | LedgerCall::BalanceOf(_)
        );
        state.calls.push(call);
        if state.failing_reads || (balance_read && state.failing_balances) {
            bail!("error sending request: connection refused");
        }
        Ok(f(&*state))
    }

    fn submit(&self, call: LedgerCall, effect: Effect) -> Result<MockPendingTx> {
        let mut state = self.state();
        state.calls.push(call);
        if state.reject_submissions {
            bail!("server returned an error response: insufficient funds for gas * price + value");
        }
        state.next_tx += 1;
        let tx_hash = TxHash::with_last_byte(state.next_tx);
        state.pending.insert(tx_hash, effect);
        Ok(MockPendingTx {
            tx_hash,
            state: self.state.clone(),
        })
    }
}

pub struct MockPendingTx {
    tx_hash: TxHash,
    state: Arc<Mutex<MockState>>,
}

impl PendingTx for MockPendingTx {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn wait(self) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(LedgerCall::Wait(self.tx_hash));
        let effect = state
            .pending
            .remove(&self.tx_hash)
            .ok_or_else(|| anyhow!("unknown transaction {}", self.tx_hash))?;
        if state.revert_on_wait {
            bail!("transaction {} reverted", self.tx_hash);
        }

        match effect {
            Effect::Approve {
                owner,
                spender,
                amount,
            } => {
                state.allowances.insert((owner, spender), amount);
            }
            Effect::Mint {
                payer,
                recipient,
                value,
            } => {
                let minted = value * state.tokens_per_native;
                let paid = state.native_balances.entry(payer).or_default();
                *paid = paid.saturating_sub(value);
                *state.token_balances.entry(recipient).or_default() += minted;
                state.collected += value;
            }
        }
        Ok(self.tx_hash)
    }
}

impl Ledger for MockLedger {
    type Pending = MockPendingTx;

    async fn native_balance(&self, account: Address) -> Result<U256> {
        self.read(LedgerCall::NativeBalance(account), |state| {
            state
                .native_balances
                .get(&account)
                .copied()
                .unwrap_or_default()
        })
        .await
    }
}

impl TokenContract for MockLedger {
    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.read(LedgerCall::BalanceOf(owner), |state| {
            state.token_balances.get(&owner).copied().unwrap_or_default()
        })
        .await
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.read(LedgerCall::Allowance { owner, spender }, |state| {
            state
                .allowances
                .get(&(owner, spender))
                .copied()
                .unwrap_or_default()
        })
        .await
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<MockPendingTx> {
        self.submit(
            LedgerCall::Approve { spender, amount },
            Effect::Approve {
                owner: self.sender,
                spender,
                amount,
            },
        )
    }
}

impl MinterContract for MockLedger {
    async fn is_mint_active(&self) -> Result<bool> {
        self.read(LedgerCall::IsMintActive, |state| state.mint_active).await
    }

    async fn calculate_tokens(&self, payment: U256) -> Result<U256> {
        self.read(LedgerCall::CalculateTokens(payment), |state| {
            payment * state.tokens_per_native
        })
        .await
    }

    async fn mint(&self, proof: U256, recipient: Address, value: U256) -> Result<MockPendingTx> {
        self.submit(
            LedgerCall::Mint {
                proof,
                recipient,
                value,
            },
            Effect::Mint {
                payer: self.sender,
                recipient,
                value,
            },
        )
    }

    async fn total_collected(&self) -> Result<U256> {
        self.read(LedgerCall::TotalCollected, |state| state.collected).await
    }

    async fn hardcap(&self) -> Result<U256> {
        self.read(LedgerCall::Hardcap, |state| state.hardcap).await
    }

    async fn mint_enabled(&self) -> Result<bool> {
        self.read(LedgerCall::MintEnabled, |state| state.mint_enabled).await
    }

    async fn claw_program(&self) -> Result<Address> {
        self.read(LedgerCall::ClawProgram, |state| state.claw_program).await
    }

    async fn treasury(&self) -> Result<Address> {
        self.read(LedgerCall::Treasury, |state| state.treasury).await
    }
}
