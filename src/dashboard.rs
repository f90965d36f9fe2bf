//! Status dashboard: wallet connection, balances and mint progress.
//!
//! The dashboard goes `Disconnected` → `ConnectedNoData` on a successful
//! connect, then `ConnectedWithData` once a refresh cycle read something.
//! Read failures are logged and leave the displayed values untouched.
//!
//! Remote calls go through [`Reader`] and their results are applied in a
//! separate step, so a slow node never holds up the rest of the dashboard.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    contracts::{MinterContract, TokenContract},
    model::{format_amount, format_token, short_address},
    utils::logger::LogMe,
};

pub mod api;
pub mod copy;
pub mod progress;
pub mod wallet;

use copy::{Clipboard, CopyControl};
use progress::{fill_percent, mint_progress};
use wallet::WalletProvider;

pub const NO_WALLET_ALERT: &str = "Please install MetaMask!";
pub const CONNECTION_FAILED_ALERT: &str = "Connection failed!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Disconnected,
    ConnectedNoData { account: Address },
    ConnectedWithData { account: Address },
}

impl DashboardState {
    pub fn account(&self) -> Option<Address> {
        match self {
            DashboardState::Disconnected => None,
            DashboardState::ConnectedNoData { account }
            | DashboardState::ConnectedWithData { account } => Some(*account),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            DashboardState::Disconnected => Phase::Disconnected,
            DashboardState::ConnectedNoData { .. } => Phase::ConnectedNoData,
            DashboardState::ConnectedWithData { .. } => Phase::ConnectedWithData,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Disconnected,
    ConnectedNoData,
    ConnectedWithData,
}

/// What the page shows. Each refresh overwrites the groups it managed to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedValues {
    pub claw_balance: U256,
    pub bnb_balance: U256,
    pub collected: U256,
    pub hardcap: U256,
    pub mint_enabled: bool,
}

impl Default for DisplayedValues {
    fn default() -> Self {
        Self {
            claw_balance: U256::ZERO,
            bnb_balance: U256::ZERO,
            collected: U256::ZERO,
            hardcap: U256::ZERO,
            mint_enabled: true,
        }
    }
}

impl DisplayedValues {
    pub fn mint_progress(&self) -> String {
        mint_progress(self.collected, self.hardcap)
    }

    fn clear_balances(&mut self) {
        self.claw_balance = U256::ZERO;
        self.bnb_balance = U256::ZERO;
    }
}

/// Serializable snapshot of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    pub phase: Phase,
    pub account: Option<Address>,
    pub account_short: Option<String>,
    pub claw_balance: String,
    pub bnb_balance: String,
    pub mint_progress: String,
    pub progress_fill: u8,
    pub mint_enabled: bool,
    pub mint_label: String,
    pub command: String,
    pub copied: bool,
    pub copy_hint: String,
    pub alert: Option<String>,
}

/// Minting contract roles, read on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinterRoles {
    pub claw_program: Option<Address>,
    pub treasury: Option<Address>,
}

/// What the wallet answered to a connect request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletAnswer {
    NoWallet,
    Refused,
    Account(Address),
}

/// Results of one fetch cycle. A group is `None` when any of its reads failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub account: Option<Address>,
    pub balances: Option<(U256, U256)>,
    pub progress: Option<(U256, U256, bool)>,
}

/// Remote side of the dashboard: the wallet and the contracts.
///
/// It never touches the dashboard state, so callers sharing a dashboard
/// behind a lock run these calls with the lock released and apply the
/// results afterwards.
pub struct Reader<W, C> {
    wallet: Option<W>,
    chain: C,
}

impl<W, C> Reader<W, C>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
{
    pub async fn request_account(&self) -> WalletAnswer {
        let Some(wallet) = &self.wallet else {
            return WalletAnswer::NoWallet;
        };
        match wallet.request_accounts().await {
            Ok(accounts) => accounts
                .first()
                .copied()
                .map_or(WalletAnswer::Refused, WalletAnswer::Account),
            Err(e) => {
                warn!("Wallet connection failed: {:#}", e);
                WalletAnswer::Refused
            }
        }
    }

    /// Balances of `account` when there is one, mint progress always.
    pub async fn fetch(&self, account: Option<Address>) -> Snapshot {
        let balances = async {
            match account {
                Some(account) => self.fetch_balances(account).await.ok(),
                None => None,
            }
        };
        let (balances, progress) = tokio::join!(balances, self.fetch_progress());
        Snapshot {
            account,
            balances,
            progress: progress.ok(),
        }
    }

    pub async fn minter_roles(&self) -> MinterRoles {
        let (claw_program, treasury) =
            tokio::join!(self.chain.claw_program(), self.chain.treasury());
        MinterRoles {
            claw_program: claw_program.log_warn("Reading clawProgram").ok(),
            treasury: treasury.log_warn("Reading treasury").ok(),
        }
    }

    async fn fetch_balances(&self, account: Address) -> Result<(U256, U256)> {
        let claw = self
            .chain
            .balance_of(account)
            .await
            .log_warn("Fetching token balance")?;
        let bnb = self
            .chain
            .native_balance(account)
            .await
            .log_warn("Fetching native balance")?;
        Ok((claw, bnb))
    }

    async fn fetch_progress(&self) -> Result<(U256, U256, bool)> {
        let collected = self
            .chain
            .total_collected()
            .await
            .log_warn("Fetching collected amount")?;
        let hardcap = self.chain.hardcap().await.log_warn("Fetching hardcap")?;
        let enabled = self
            .chain
            .mint_enabled()
            .await
            .log_warn("Fetching mint status")?;
        Ok((collected, hardcap, enabled))
    }
}

pub struct Dashboard<W, C, K> {
    reader: Arc<Reader<W, C>>,
    copy: CopyControl<K>,
    state: DashboardState,
    values: DisplayedValues,
    alert: Option<String>,
}

impl<W, C, K> Dashboard<W, C, K>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
    K: Clipboard,
{
    /// `wallet` is `None` when no provider was injected.
    pub fn new(wallet: Option<W>, chain: C, copy: CopyControl<K>) -> Self {
        Self {
            reader: Arc::new(Reader { wallet, chain }),
            copy,
            state: DashboardState::Disconnected,
            values: DisplayedValues::default(),
            alert: None,
        }
    }

    pub fn reader(&self) -> Arc<Reader<W, C>> {
        self.reader.clone()
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn values(&self) -> &DisplayedValues {
        &self.values
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn copy_control(&self) -> &CopyControl<K> {
        &self.copy
    }

    /// User-initiated connect. Failures surface as an alert and leave the
    /// current state untouched.
    pub async fn connect(&mut self) -> DashboardState {
        let answer = self.reader.request_account().await;
        if self.apply_wallet_answer(answer).is_some() {
            self.refresh().await;
        }
        self.state
    }

    /// One fetch cycle. Reads balances when an account is connected, and
    /// mint progress in every state.
    pub async fn refresh(&mut self) -> DashboardState {
        let snapshot = self.reader.fetch(self.state.account()).await;
        self.apply_snapshot(snapshot)
    }

    pub async fn refresh_progress(&mut self) {
        let snapshot = self.reader.fetch(None).await;
        self.apply_snapshot(snapshot);
    }

    /// Records a connect attempt and returns the account to fetch for.
    ///
    /// Switching to another account drops the balances shown for the previous
    /// one. Reconnecting the same account keeps the current phase.
    pub fn apply_wallet_answer(&mut self, answer: WalletAnswer) -> Option<Address> {
        let account = match answer {
            WalletAnswer::NoWallet => {
                self.alert = Some(NO_WALLET_ALERT.to_string());
                return None;
            }
            WalletAnswer::Refused => {
                self.alert = Some(CONNECTION_FAILED_ALERT.to_string());
                return None;
            }
            WalletAnswer::Account(account) => account,
        };

        info!("Connected account {}", account);
        self.alert = None;
        if self.state.account() != Some(account) {
            self.values.clear_balances();
            self.state = DashboardState::ConnectedNoData { account };
        }
        Some(account)
    }

    /// Applies a fetch cycle. Balances read for an account that is no longer
    /// connected are ignored.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> DashboardState {
        let progress_ok = snapshot.progress.is_some();
        if let Some(progress) = snapshot.progress {
            self.apply_progress(progress);
        }

        let current = self.state.account();
        let Some(account) = snapshot.account.filter(|a| current == Some(*a)) else {
            return self.state;
        };

        let balances_ok = snapshot.balances.is_some();
        if let Some((claw, bnb)) = snapshot.balances {
            self.values.claw_balance = claw;
            self.values.bnb_balance = bnb;
        }

        if balances_ok || progress_ok {
            self.state = DashboardState::ConnectedWithData { account };
        }
        self.state
    }

    pub fn copy_command(&mut self) -> Result<()> {
        self.copy.trigger()
    }

    pub async fn minter_roles(&self) -> MinterRoles {
        self.reader.minter_roles().await
    }

    pub fn status(&self) -> StatusView {
        let account = self.state.account();
        StatusView {
            phase: self.state.phase(),
            account,
            account_short: account.map(|a| short_address(&a, 6, 4)),
            claw_balance: format_token(self.values.claw_balance),
            bnb_balance: format_amount(self.values.bnb_balance, 4),
            mint_progress: self.values.mint_progress(),
            progress_fill: fill_percent(self.values.collected, self.values.hardcap),
            mint_enabled: self.values.mint_enabled,
            mint_label: if self.values.mint_enabled {
                "ACTIVE".to_string()
            } else {
                "ENDED".to_string()
            },
            command: self.copy.command().to_string(),
            copied: self.copy.is_copied(),
            copy_hint: self.copy.hint().to_string(),
            alert: self.alert.clone(),
        }
    }

    fn apply_progress(&mut self, (collected, hardcap, enabled): (U256, U256, bool)) {
        self.values.collected = collected;
        self.values.hardcap = hardcap;
        self.values.mint_enabled = enabled;
    }
}
