// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sender wallet endpoints.

use axum::{extract::State, Json};
use tracing::{error, info, warn};

use crate::{
    error::ApiError,
    models::WalletResponse,
    session::Action,
    state::AppState,
};

/// Create the sender wallet, or return the existing one, with its balances.
#[utoipa::path(
    post,
    path = "/api/sender",
    tag = "Sender",
    responses(
        (status = 200, description = "Sender wallet", body = WalletResponse),
        (status = 409, description = "Another action is running"),
        (status = 500, description = "Wallet provider failure")
    )
)]
pub async fn create_sender(State(state): State<AppState>) -> Result<Json<WalletResponse>, ApiError> {
    let _guard = state.session.begin(Action::Sender)?;
    state.session.update(|s| s.tx_result = None);

    let wallet = state.sender_wallet().await.map_err(|e| {
        error!(error = %e, "Failed to create sender wallet");
        ApiError::from(e)
    })?;
    info!(address = %wallet.address, "Sender wallet ready");
    state.session.update(|s| s.sender = Some(wallet.clone()));

    let balances = match state
        .provider
        .balances(&wallet, &state.config.tracked_tokens())
        .await
    {
        Ok(balances) => Some(balances),
        Err(e) => {
            warn!(error = %e, "Failed to fetch sender balances");
            None
        }
    };
    state
        .session
        .update(|s| s.sender_balances = balances.clone());

    Ok(Json(WalletResponse {
        success: true,
        address: wallet.address,
        chain: wallet.chain,
        balances,
    }))
}

/// Refresh the sender wallet's balances.
#[utoipa::path(
    get,
    path = "/api/sender",
    tag = "Sender",
    responses(
        (status = 200, description = "Sender wallet", body = WalletResponse),
        (status = 404, description = "Sender not created yet"),
        (status = 500, description = "Wallet provider failure")
    )
)]
pub async fn get_sender(State(state): State<AppState>) -> Result<Json<WalletResponse>, ApiError> {
    let wallet = state
        .existing_sender()
        .await
        .ok_or_else(|| ApiError::not_found("Sender wallet not found. Create it first."))?;

    let balances = state
        .provider
        .balances(&wallet, &state.config.tracked_tokens())
        .await?;
    state
        .session
        .update(|s| s.sender_balances = Some(balances.clone()));

    Ok(Json(WalletResponse {
        success: true,
        address: wallet.address,
        chain: wallet.chain,
        balances: Some(balances),
    }))
}
