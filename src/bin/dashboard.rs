use anyhow::{Context, Result};
use clap::Parser;
use clawp::{
    contracts::evm::EvmClient,
    dashboard::{
        api::{self, ApiContext, ContractAddresses},
        copy::{CopyControl, MemoryClipboard},
        wallet::{ConfiguredWallet, RpcWallet, StaticWallet},
        Dashboard,
    },
    utils::{cli::Args, conf::Conf, logger::setup_tracing},
};
use tracing::info;

fn configured_wallet(config: &Conf) -> Result<Option<ConfiguredWallet>> {
    if let Some(url) = config.dashboard_wallet_url()? {
        return Ok(Some(ConfiguredWallet::Rpc(RpcWallet::connect(url))));
    }
    Ok(config
        .dashboard_account()?
        .map(|account| ConfiguredWallet::Static(StaticWallet::new(vec![account]))))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Conf::new(args.config_file).context("reading config")?;
    setup_tracing(config.log_format.parse()?)?;

    let contracts = ContractAddresses {
        token: config.token_address()?,
        minter: config.dashboard_minter()?,
    };
    let chain = EvmClient::connect(config.rpc_url()?, None, contracts.token, contracts.minter);
    let wallet = configured_wallet(&config)?;
    if wallet.is_none() {
        info!("No wallet configured, connect requests will be refused");
    }

    let mut dashboard = Dashboard::new(
        wallet,
        chain,
        CopyControl::new(&config.dashboard.origin, MemoryClipboard::default()),
    );
    dashboard.refresh().await;
    info!("Mint progress: {}%", dashboard.status().mint_progress);

    let app = api::api(
        dashboard,
        ApiContext {
            contracts,
            explorer_url: config.explorer_url.clone(),
        },
    );
    api::serve(&config.dashboard.rest, app).await
}
