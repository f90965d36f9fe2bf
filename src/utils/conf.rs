use alloy::{
    primitives::{utils::parse_ether, Address, U256},
    signers::{local::PrivateKeySigner, Signer},
};
use anyhow::{bail, Context, Result};
use config::{Config, ConfigError, Environment, File, FileFormat};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::model::AccountRef;

/// Environment variable holding the hex-encoded signing key.
pub const PRIVATE_KEY_ENV: &str = "CLAWP_PRIVATE_KEY";

static DEFAULT_CONF: &str = include_str!("conf_defaults.ron");

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApproveConf {
    /// In whole tokens, e.g. "70000000".
    pub amount: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MintConf {
    pub recipient: String,
    /// In BNB, e.g. "0.01".
    pub payment: String,
    pub proof: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DashboardConf {
    pub rest: String,
    /// Public origin the onboarding command points at.
    pub origin: String,
    /// The dashboard shows a separate minter deployment.
    pub minter: String,
    /// JSON-RPC endpoint of the user's wallet, answering `eth_requestAccounts`.
    pub wallet_rpc_url: Option<String>,
    /// Watch-only account used when no wallet endpoint is set.
    pub account: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Conf {
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: String,
    pub token: String,
    pub minter: String,
    pub log_format: String,
    pub approve: ApproveConf,
    pub mint: MintConf,
    pub dashboard: DashboardConf,
}

impl Conf {
    pub fn new(config_file: Option<String>) -> Result<Self, ConfigError> {
        let mut s = Config::builder().add_source(File::from_str(DEFAULT_CONF, FileFormat::Ron));
        // Priority order: config file, then environment variables
        if let Some(config_file) = config_file {
            s = s.add_source(File::with_name(&config_file));
        }
        s.add_source(
            Environment::with_prefix("clawp")
                .separator("__")
                .prefix_separator("_"),
        )
        .build()?
        .try_deserialize()
    }

    pub fn rpc_url(&self) -> Result<Url> {
        self.rpc_url.parse().context("parsing rpc_url")
    }

    pub fn token_address(&self) -> Result<Address> {
        parse_address("token", &self.token)
    }

    pub fn minter_address(&self) -> Result<Address> {
        parse_address("minter", &self.minter)
    }

    pub fn approve_amount(&self) -> Result<U256> {
        parse_positive("approve.amount", &self.approve.amount)
    }

    pub fn mint_recipient(&self) -> Result<Address> {
        parse_address("mint.recipient", &self.mint.recipient)
    }

    pub fn mint_payment(&self) -> Result<U256> {
        parse_positive("mint.payment", &self.mint.payment)
    }

    pub fn dashboard_minter(&self) -> Result<Address> {
        parse_address("dashboard.minter", &self.dashboard.minter)
    }

    pub fn dashboard_wallet_url(&self) -> Result<Option<Url>> {
        self.dashboard
            .wallet_rpc_url
            .as_deref()
            .map(|url| url.parse().context("parsing dashboard.wallet_rpc_url"))
            .transpose()
    }

    pub fn dashboard_account(&self) -> Result<Option<Address>> {
        self.dashboard
            .account
            .as_deref()
            .map(|account| parse_address("dashboard.account", account))
            .transpose()
    }
}

/// Loads the signing account from [`PRIVATE_KEY_ENV`]. Never from a file.
pub fn signing_account(chain_id: u64) -> Result<AccountRef> {
    let key = std::env::var(PRIVATE_KEY_ENV)
        .with_context(|| format!("{PRIVATE_KEY_ENV} is not set"))?;
    let signer = parse_signer(&key)?.with_chain_id(Some(chain_id));
    Ok(AccountRef::Signing(signer))
}

fn parse_signer(key: &str) -> Result<PrivateKeySigner> {
    key.trim()
        .parse::<PrivateKeySigner>()
        .with_context(|| format!("{PRIVATE_KEY_ENV} is not a valid private key"))
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    value
        .trim()
        .parse()
        .with_context(|| format!("parsing {field} address {value:?}"))
}

fn parse_positive(field: &str, value: &str) -> Result<U256> {
    let amount = parse_ether(value.trim()).with_context(|| format!("parsing {field} {value:?}"))?;
    if amount.is_zero() {
        bail!("{field} must be greater than zero");
    }
    Ok(amount)
}
