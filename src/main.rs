// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wallet_transfer_demo::{
    api::router,
    config::{AppConfig, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    state::AppState,
    wallet::client::WalletApiClient,
};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match WalletApiClient::new(&config.api_base_url, &config.server_api_key) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build wallet provider client");
            return ExitCode::FAILURE;
        }
    };

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, host = %config.host, port = config.port, "Invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    info!(
        chain = %config.chain,
        token = %config.token,
        recipient_mode = ?config.recipient_mode,
        "Starting wallet transfer demo"
    );

    let state = AppState::new(config, Arc::new(client));
    let tasks = state.tasks.clone();
    let app = router(state);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("Wallet transfer demo listening on http://{addr} (docs at /docs)");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Let running fund/send tasks finish their balance polling.
    tasks.close();
    if !tasks.is_empty() {
        info!(tasks = tasks.len(), "Waiting for transfer tasks to finish");
    }
    tasks.wait().await;

    match result {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}
