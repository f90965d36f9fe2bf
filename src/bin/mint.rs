use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::Parser;
use clawp::{
    contracts::evm::EvmClient,
    model::{format_token, tx_link},
    utils::{
        cli::Args,
        conf::{self, Conf},
        logger::{setup_tracing, LogMe},
    },
    workflows::mint::{self, MintOutcome, MintRequest},
};
use tracing::{error, info};

async fn run(config: &Conf) -> Result<MintOutcome> {
    let payer = conf::signing_account(config.chain_id)?;
    let request = MintRequest {
        payer: payer.address(),
        recipient: config.mint_recipient()?,
        payment: config.mint_payment()?,
        proof: U256::from(config.mint.proof),
    };
    let chain = EvmClient::connect(
        config.rpc_url()?,
        Some(&payer),
        config.token_address()?,
        config.minter_address()?,
    );

    info!("Wallet: {}", request.payer);
    info!("Recipient: {}", request.recipient);
    info!("BNB amount: {}", format_token(request.payment));

    mint::run(&chain, &request).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Conf::new(args.config_file).context("reading config")?;
    setup_tracing(config.log_format.parse()?)?;

    info!("=== CLAWP MINT ===");

    let Ok(outcome) = run(&config).await.log_error("✗ MINT FAILED") else {
        std::process::exit(1);
    };

    match outcome {
        MintOutcome::Rejected(reason) => {
            error!("ERROR: {}", reason);
            std::process::exit(1);
        }
        MintOutcome::Minted(receipt) => {
            info!("✓ MINT SUCCESSFUL!");
            info!(
                "View on explorer: {}",
                tx_link(&config.explorer_url, &receipt.tx_hash)
            );
            info!(
                "Recipient CLAWP balance: {}",
                format_token(receipt.recipient_balance)
            );
        }
    }

    Ok(())
}
