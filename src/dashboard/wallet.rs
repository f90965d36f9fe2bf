//! Wallet providers the dashboard can ask for an account.

use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard},
};

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use anyhow::{Context, Result};
use reqwest::Url;

pub trait WalletProvider: Send + Sync {
    /// Asks the wallet to expose its accounts. A user rejection is an error.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<Address>>> + Send;
}

/// A wallet reachable over JSON-RPC (`eth_requestAccounts`).
pub struct RpcWallet {
    provider: DynProvider,
}

impl RpcWallet {
    pub fn connect(url: Url) -> Self {
        Self {
            provider: ProviderBuilder::new().connect_http(url).erased(),
        }
    }
}

impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), Vec::<String>::new())
            .await
            .context("requesting wallet accounts")
    }
}

/// A wallet answering with the accounts it currently holds, or refusing.
/// Clones share the answer, so the account can be switched later on.
#[derive(Debug, Clone)]
pub struct StaticWallet {
    accounts: Arc<Mutex<Option<Vec<Address>>>>,
}

impl StaticWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(Some(accounts))),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.answer() = Some(accounts);
    }

    fn answer(&self) -> MutexGuard<'_, Option<Vec<Address>>> {
        self.accounts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let accounts = self.answer().clone();
        accounts.context("User rejected the request.")
    }
}

/// The wallet the dashboard binary was configured with.
pub enum ConfiguredWallet {
    Rpc(RpcWallet),
    Static(StaticWallet),
}

impl WalletProvider for ConfiguredWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        match self {
            ConfiguredWallet::Rpc(wallet) => wallet.request_accounts().await,
            ConfiguredWallet::Static(wallet) => wallet.request_accounts().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use assertables::assert_err;

    use super::*;

    #[test_log::test(tokio::test)]
    async fn static_wallet_answers() -> Result<()> {
        let account = address!("8def3283a6fac005be6e6a2d97338ef282bc0c11");
        let wallet = ConfiguredWallet::Static(StaticWallet::new(vec![account]));
        assert_eq!(wallet.request_accounts().await?, vec![account]);

        let wallet = ConfiguredWallet::Static(StaticWallet::rejecting());
        assert_err!(wallet.request_accounts().await);
        Ok(())
    }

    #[test_log::test(tokio::test)]
    async fn static_wallet_switches_account() -> Result<()> {
        let first = address!("8def3283a6fac005be6e6a2d97338ef282bc0c11");
        let second = address!("00000000000000000000000000000000000000cc");
        let wallet = StaticWallet::new(vec![first]);
        let handle = wallet.clone();

        handle.set_accounts(vec![second]);
        assert_eq!(wallet.request_accounts().await?, vec![second]);

        let wallet = StaticWallet::rejecting();
        wallet.set_accounts(vec![first]);
        assert_eq!(wallet.request_accounts().await?, vec![first]);
        Ok(())
    }
}
