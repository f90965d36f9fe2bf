//! HTTP surface of the dashboard.
//!
//! Handlers lock the dashboard only to read or apply state. Wallet and
//! contract calls run on the shared [`Reader`] with the lock released.

use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    copy::{Clipboard, MemoryClipboard},
    wallet::WalletProvider,
    Dashboard, MinterRoles, Reader, StatusView,
};
use crate::{
    contracts::{MinterContract, TokenContract},
    model::{address_link, short_address},
};

type SharedDashboard<W, C, K> = Arc<Mutex<Dashboard<W, C, K>>>;

/// Static contract information shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub token: Address,
    pub token_short: String,
    pub token_link: String,
    pub minter: Address,
    pub minter_short: String,
    pub minter_link: String,
    pub roles: MinterRoles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyResponse {
    pub text: String,
    pub status: StatusView,
}

pub struct RouterState<W, C, K> {
    dashboard: SharedDashboard<W, C, K>,
    reader: Arc<Reader<W, C>>,
    contracts: ContractAddresses,
    explorer_url: Arc<str>,
}

impl<W, C, K> Clone for RouterState<W, C, K> {
    fn clone(&self) -> Self {
        Self {
            dashboard: self.dashboard.clone(),
            reader: self.reader.clone(),
            contracts: self.contracts,
            explorer_url: self.explorer_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    pub token: Address,
    pub minter: Address,
}

#[derive(Debug, Clone)]
pub struct ApiContext {
    pub contracts: ContractAddresses,
    pub explorer_url: String,
}

pub fn api<W, C>(dashboard: Dashboard<W, C, MemoryClipboard>, ctx: ApiContext) -> Router
where
    W: WalletProvider + 'static,
    C: TokenContract + MinterContract + 'static,
{
    let reader = dashboard.reader();
    Router::new()
        .route("/v1/status", get(get_status::<W, C, MemoryClipboard>))
        .route("/v1/connect", post(connect::<W, C, MemoryClipboard>))
        .route("/v1/refresh", post(refresh::<W, C, MemoryClipboard>))
        .route("/v1/copy", post(copy_command::<W, C>))
        .route("/v1/info", get(get_info::<W, C, MemoryClipboard>))
        .with_state(RouterState {
            dashboard: Arc::new(Mutex::new(dashboard)),
            reader,
            contracts: ctx.contracts,
            explorer_url: ctx.explorer_url.into(),
        })
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(rest_addr: &str, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(rest_addr)
        .await
        .context("Starting dashboard server")?;

    info!("dashboard listening on {}", rest_addr);

    axum::serve(listener, app)
        .await
        .context("Running dashboard server")
}

async fn get_status<W, C, K>(State(state): State<RouterState<W, C, K>>) -> Json<StatusView>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
    K: Clipboard,
{
    Json(state.dashboard.lock().await.status())
}

async fn connect<W, C, K>(State(state): State<RouterState<W, C, K>>) -> Json<StatusView>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
    K: Clipboard,
{
    let answer = state.reader.request_account().await;
    let account = state.dashboard.lock().await.apply_wallet_answer(answer);

    if let Some(account) = account {
        let snapshot = state.reader.fetch(Some(account)).await;
        state.dashboard.lock().await.apply_snapshot(snapshot);
    }
    Json(state.dashboard.lock().await.status())
}

async fn refresh<W, C, K>(State(state): State<RouterState<W, C, K>>) -> Json<StatusView>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
    K: Clipboard,
{
    let account = state.dashboard.lock().await.state().account();
    let snapshot = state.reader.fetch(account).await;

    let mut dashboard = state.dashboard.lock().await;
    dashboard.apply_snapshot(snapshot);
    Json(dashboard.status())
}

async fn copy_command<W, C>(
    State(state): State<RouterState<W, C, MemoryClipboard>>,
) -> Result<Json<CopyResponse>, AppError>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
{
    let mut dashboard = state.dashboard.lock().await;
    dashboard.copy_command()?;
    let text = dashboard
        .copy_control()
        .clipboard()
        .contents()
        .unwrap_or_default()
        .to_string();
    Ok(Json(CopyResponse {
        text,
        status: dashboard.status(),
    }))
}

async fn get_info<W, C, K>(State(state): State<RouterState<W, C, K>>) -> Json<ContractInfo>
where
    W: WalletProvider,
    C: TokenContract + MinterContract,
    K: Clipboard,
{
    let roles = state.reader.minter_roles().await;
    let ContractAddresses { token, minter } = state.contracts;
    Json(ContractInfo {
        token,
        token_short: short_address(&token, 8, 6),
        token_link: address_link(&state.explorer_url, &token),
        minter,
        minter_short: short_address(&minter, 8, 6),
        minter_link: address_link(&state.explorer_url, &minter),
        roles,
    })
}

// Make our own error that wraps `anyhow::Error`.
pub struct AppError(pub StatusCode, pub anyhow::Error);

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, format!("{:#}", self.1)).into_response()
    }
}

// Lets handlers use `?` on anything convertible into `anyhow::Error`.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, err.into())
    }
}
