use std::{future::IntoFuture, time::Duration};

use alloy::primitives::{utils::parse_ether, Address};
use anyhow::Result;
use clawp::{
    dashboard::{
        api::{ContractInfo, CopyResponse},
        wallet::StaticWallet,
        Phase, StatusView, CONNECTION_FAILED_ALERT, NO_WALLET_ALERT,
    },
    tools::mock_ledger::LedgerCall,
};
use fixtures::ctx::{DashboardCtx, MINTER, ORIGIN, TOKEN, USER};
use tokio::time::timeout;

mod fixtures;

#[test_log::test(tokio::test)]
async fn status_starts_disconnected() -> Result<()> {
    let ctx = DashboardCtx::connected()?;

    let status = ctx.server.get("/v1/status").await.json::<StatusView>();

    assert_eq!(status.phase, Phase::Disconnected);
    assert_eq!(status.account, None);
    assert_eq!(status.claw_balance, "0.0");
    assert_eq!(status.bnb_balance, "0.0000");
    assert_eq!(status.mint_progress, "0.00");
    assert!(status.mint_enabled);
    assert_eq!(status.command, format!("curl -s {ORIGIN}/skill.md"));
    assert_eq!(status.copy_hint, "CLICK_TO_COPY");
    assert!(ctx.ledger.calls().is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn connect_then_status() -> Result<()> {
    let ctx = DashboardCtx::connected()?;

    let connected = ctx.server.post("/v1/connect").await.json::<StatusView>();
    let status = ctx.server.get("/v1/status").await.json::<StatusView>();

    assert_eq!(connected, status);
    assert_eq!(status.phase, Phase::ConnectedWithData);
    assert_eq!(status.account, Some(USER));
    assert_eq!(status.claw_balance, "312000.0");
    assert_eq!(status.bnb_balance, "1.5000");
    assert_eq!(status.mint_progress, "25.00");
    assert_eq!(status.mint_label, "ACTIVE");
    assert!(ctx.ledger.calls().contains(&LedgerCall::BalanceOf(USER)));
    assert!(ctx.ledger.calls().contains(&LedgerCall::Hardcap));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn connect_failures_are_alerts() -> Result<()> {
    let ctx = DashboardCtx::new(None)?;
    let status = ctx.server.post("/v1/connect").await.json::<StatusView>();
    assert_eq!(status.phase, Phase::Disconnected);
    assert_eq!(status.alert.as_deref(), Some(NO_WALLET_ALERT));

    let ctx = DashboardCtx::new(Some(StaticWallet::rejecting()))?;
    let status = ctx.server.post("/v1/connect").await.json::<StatusView>();
    assert_eq!(status.phase, Phase::Disconnected);
    assert_eq!(status.alert.as_deref(), Some(CONNECTION_FAILED_ALERT));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn reconnect_switches_account() -> Result<()> {
    let wallet = StaticWallet::new(vec![USER]);
    let ctx = DashboardCtx::new(Some(wallet.clone()))?;
    ctx.server.post("/v1/connect").await.assert_status_ok();

    let other = Address::with_last_byte(0xcc);
    ctx.ledger.set_failing_balances(true);
    wallet.set_accounts(vec![other]);
    let status = ctx.server.post("/v1/connect").await.json::<StatusView>();

    assert_eq!(status.phase, Phase::ConnectedWithData);
    assert_eq!(status.account, Some(other));
    assert_eq!(status.claw_balance, "0.0");
    assert_eq!(status.bnb_balance, "0.0000");
    assert_eq!(status.mint_progress, "25.00");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn hung_read_leaves_other_requests_served() -> Result<()> {
    let ctx = DashboardCtx::connected()?;
    ctx.ledger.set_hanging_reads(true);

    let connect = ctx.server.post("/v1/connect").into_future();
    tokio::pin!(connect);
    assert!(
        timeout(Duration::from_millis(200), &mut connect).await.is_err(),
        "connect should wait on the ledger"
    );

    let copied = timeout(Duration::from_secs(3), ctx.server.post("/v1/copy"))
        .await?
        .json::<CopyResponse>();
    assert!(copied.status.copied);

    let status = timeout(Duration::from_secs(3), ctx.server.get("/v1/status"))
        .await?
        .json::<StatusView>();
    assert_eq!(status.phase, Phase::ConnectedNoData);
    assert_eq!(status.account, Some(USER));

    let refresh = timeout(Duration::from_millis(200), ctx.server.post("/v1/refresh")).await;
    assert!(refresh.is_err(), "refresh should wait on the ledger too");

    let status = timeout(Duration::from_secs(3), ctx.server.get("/v1/status"))
        .await?
        .json::<StatusView>();
    assert_eq!(status.phase, Phase::ConnectedNoData);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn refresh_picks_up_new_progress() -> Result<()> {
    let ctx = DashboardCtx::connected()?;
    ctx.server.post("/v1/connect").await.assert_status_ok();

    ctx.ledger.set_collected(parse_ether("75")?);
    let status = ctx.server.post("/v1/refresh").await.json::<StatusView>();

    assert_eq!(status.mint_progress, "75.00");
    assert_eq!(status.progress_fill, 75);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn refresh_failure_keeps_stale_values() -> Result<()> {
    let ctx = DashboardCtx::connected()?;
    let before = ctx.server.post("/v1/connect").await.json::<StatusView>();

    ctx.ledger.set_failing_reads(true);
    let response = ctx.server.post("/v1/refresh").await;

    response.assert_status_ok();
    let after = response.json::<StatusView>();
    assert_eq!(after.claw_balance, before.claw_balance);
    assert_eq!(after.mint_progress, before.mint_progress);
    assert_eq!(after.phase, Phase::ConnectedWithData);
    assert_eq!(after.alert, None);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn copy_returns_the_command() -> Result<()> {
    let ctx = DashboardCtx::new(None)?;

    let copied = ctx.server.post("/v1/copy").await.json::<CopyResponse>();

    assert_eq!(copied.text, format!("curl -s {ORIGIN}/skill.md"));
    assert!(copied.status.copied);
    assert_eq!(copied.status.copy_hint, "COPIED!");
    Ok(())
}

#[test_log::test(tokio::test)]
async fn info_lists_contracts() -> Result<()> {
    let ctx = DashboardCtx::new(None)?;

    let info = ctx.server.get("/v1/info").await.json::<ContractInfo>();

    assert_eq!(info.token, TOKEN);
    assert_eq!(info.token_short, "0x6Da879...d6b3Cd");
    assert_eq!(
        info.token_link,
        "https://bscscan.com/address/0x6Da8794e33549201B6d1a2559B57954dA6d6b3Cd"
    );
    assert_eq!(info.minter, MINTER);
    assert_eq!(info.minter_short, "0x88dB8F...617836");
    assert_eq!(info.roles.claw_program, Some(Address::ZERO));
    assert!(ctx.ledger.calls().contains(&LedgerCall::Treasury));
    Ok(())
}
