//! JSON-RPC implementation of the contract capabilities, backed by `alloy`.

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    sol,
};
use anyhow::{bail, Context, Result};
use reqwest::Url;
use tracing::debug;

use super::{Ledger, MinterContract, PendingTx, TokenContract};
use crate::model::AccountRef;

sol! {
    #[sol(rpc)]
    interface IClawToken {
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[sol(rpc)]
    interface IClawMinter {
        function mint(uint256 _agentProof, address recipient) external payable;
        function calculateTokens(uint256 bnbAmount) external view returns (uint256);
        function isMintActive() external view returns (bool);
        function totalBNBCollected() external view returns (uint256);
        function MINT_HARDCAP() external view returns (uint256);
        function mintEnabled() external view returns (bool);
        function clawProgram() external view returns (address);
        function treasury() external view returns (address);
    }
}

/// Builds a provider for `rpc_url`, signing with the account's secret when it has one.
pub fn connect_provider(rpc_url: Url, account: Option<&AccountRef>) -> DynProvider {
    match account.and_then(AccountRef::signer) {
        Some(signer) => ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(rpc_url)
            .erased(),
        None => ProviderBuilder::new().connect_http(rpc_url).erased(),
    }
}

/// One ledger connection, bound to the token and minter addresses.
#[derive(Clone)]
pub struct EvmClient {
    provider: DynProvider,
    token: IClawToken::IClawTokenInstance<DynProvider>,
    minter: IClawMinter::IClawMinterInstance<DynProvider>,
}

impl EvmClient {
    pub fn new(provider: DynProvider, token: Address, minter: Address) -> Self {
        Self {
            token: IClawToken::new(token, provider.clone()),
            minter: IClawMinter::new(minter, provider.clone()),
            provider,
        }
    }

    pub fn connect(
        rpc_url: Url,
        account: Option<&AccountRef>,
        token: Address,
        minter: Address,
    ) -> Self {
        Self::new(connect_provider(rpc_url, account), token, minter)
    }

    pub fn token_address(&self) -> Address {
        *self.token.address()
    }

    pub fn minter_address(&self) -> Address {
        *self.minter.address()
    }
}

pub struct EvmPendingTx(PendingTransactionBuilder<Ethereum>);

impl PendingTx for EvmPendingTx {
    fn tx_hash(&self) -> TxHash {
        *self.0.tx_hash()
    }

    async fn wait(self) -> Result<TxHash> {
        let tx_hash = *self.0.tx_hash();
        let receipt = self
            .0
            .get_receipt()
            .await
            .with_context(|| format!("waiting for confirmation of {tx_hash}"))?;
        if !receipt.status() {
            bail!("transaction {tx_hash} reverted");
        }
        debug!(%tx_hash, block = ?receipt.block_number, "transaction confirmed");
        Ok(tx_hash)
    }
}

impl Ledger for EvmClient {
    type Pending = EvmPendingTx;

    async fn native_balance(&self, account: Address) -> Result<U256> {
        self.provider
            .get_balance(account)
            .await
            .context("getting native balance")
    }
}

impl TokenContract for EvmClient {
    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.token
            .balanceOf(owner)
            .call()
            .await
            .context("calling balanceOf")
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.token
            .allowance(owner, spender)
            .call()
            .await
            .context("calling allowance")
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<EvmPendingTx> {
        self.token
            .approve(spender, amount)
            .send()
            .await
            .map(EvmPendingTx)
            .context("sending approve")
    }
}

impl MinterContract for EvmClient {
    async fn is_mint_active(&self) -> Result<bool> {
        self.minter
            .isMintActive()
            .call()
            .await
            .context("calling isMintActive")
    }

    async fn calculate_tokens(&self, payment: U256) -> Result<U256> {
        self.minter
            .calculateTokens(payment)
            .call()
            .await
            .context("calling calculateTokens")
    }

    async fn mint(&self, proof: U256, recipient: Address, value: U256) -> Result<EvmPendingTx> {
        self.minter
            .mint(proof, recipient)
            .value(value)
            .send()
            .await
            .map(EvmPendingTx)
            .context("sending mint")
    }

    async fn total_collected(&self) -> Result<U256> {
        self.minter
            .totalBNBCollected()
            .call()
            .await
            .context("calling totalBNBCollected")
    }

    async fn hardcap(&self) -> Result<U256> {
        self.minter
            .MINT_HARDCAP()
            .call()
            .await
            .context("calling MINT_HARDCAP")
    }

    async fn mint_enabled(&self) -> Result<bool> {
        self.minter
            .mintEnabled()
            .call()
            .await
            .context("calling mintEnabled")
    }

    async fn claw_program(&self) -> Result<Address> {
        self.minter
            .clawProgram()
            .call()
            .await
            .context("calling clawProgram")
    }

    async fn treasury(&self) -> Result<Address> {
        self.minter
            .treasury()
            .call()
            .await
            .context("calling treasury")
    }
}
