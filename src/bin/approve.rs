use anyhow::{Context, Result};
use clap::Parser;
use clawp::{
    contracts::evm::EvmClient,
    model::format_token,
    utils::{
        cli::Args,
        conf::{self, Conf},
        logger::{setup_tracing, LogMe},
    },
    workflows::approve::{self, ApproveOutcome, ApproveRequest},
};
use tracing::info;

async fn run(config: &Conf) -> Result<ApproveOutcome> {
    let treasury = conf::signing_account(config.chain_id)?;
    let spender = config.minter_address()?;
    let chain = EvmClient::connect(
        config.rpc_url()?,
        Some(&treasury),
        config.token_address()?,
        spender,
    );

    info!("Treasury: {}", treasury.address());
    info!("Spender: {}", spender);

    let request = ApproveRequest {
        owner: treasury.address(),
        spender,
        amount: config.approve_amount()?,
    };
    approve::run(&chain, &request).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Conf::new(args.config_file).context("reading config")?;
    setup_tracing(config.log_format.parse()?)?;

    info!("=== APPROVE MINT CONTRACT ===");

    let Ok(outcome) = run(&config).await.log_error("✗ FAILED") else {
        std::process::exit(1);
    };

    match outcome {
        ApproveOutcome::AlreadyApproved { allowance } => {
            info!("Nothing to do, allowance is {}", format_token(allowance));
        }
        ApproveOutcome::Approved { tx_hash, amount } => {
            info!("✓ APPROVED! ({})", tx_hash);
            info!(
                "Mint contract can now transfer {} CLAWP.",
                format_token(amount)
            );
        }
    }

    Ok(())
}
