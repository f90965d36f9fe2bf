use alloy::primitives::{address, utils::parse_ether, Address};
use anyhow::Result;
use axum_test::TestServer;
use clawp::{
    dashboard::{
        api::{self, ApiContext, ContractAddresses},
        copy::{CopyControl, MemoryClipboard},
        wallet::StaticWallet,
        Dashboard,
    },
    tools::mock_ledger::MockLedger,
};

pub const USER: Address = address!("8def3283a6fac005be6e6a2d97338ef282bc0c11");
pub const TOKEN: Address = address!("6Da8794e33549201B6d1a2559B57954dA6d6b3Cd");
pub const MINTER: Address = address!("88dB8Fa59191696454814331d46d23544f617836");
pub const ORIGIN: &str = "https://clawp.example";

/// A dashboard API served over an in-memory ledger.
pub struct DashboardCtx {
    pub ledger: MockLedger,
    pub server: TestServer,
}

impl DashboardCtx {
    pub fn new(wallet: Option<StaticWallet>) -> Result<Self> {
        let ledger = MockLedger::new(USER)
            .with_token_balance(USER, parse_ether("312000")?)
            .with_native_balance(USER, parse_ether("1.5")?)
            .with_progress(parse_ether("25")?, parse_ether("100")?);
        Self::with_ledger(wallet, ledger)
    }

    pub fn with_ledger(wallet: Option<StaticWallet>, ledger: MockLedger) -> Result<Self> {
        let dashboard = Dashboard::new(
            wallet,
            ledger.clone(),
            CopyControl::new(ORIGIN, MemoryClipboard::default()),
        );
        let router = api::api(
            dashboard,
            ApiContext {
                contracts: ContractAddresses {
                    token: TOKEN,
                    minter: MINTER,
                },
                explorer_url: "https://bscscan.com".to_string(),
            },
        );
        Ok(Self {
            ledger,
            server: TestServer::new(router)?,
        })
    }

    pub fn connected() -> Result<Self> {
        Self::new(Some(StaticWallet::new(vec![USER])))
    }
}
