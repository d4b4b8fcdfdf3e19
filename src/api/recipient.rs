// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recipient wallet endpoints.
//!
//! The recipient is held by the server and created with the server API key.

use axum::{extract::State, Json};
use tracing::{error, info, warn};

use crate::{
    error::ApiError,
    models::{RecipientInfo, WalletResponse},
    session::Action,
    state::AppState,
};

/// Create the recipient wallet, or return the existing one.
///
/// Balances are fetched best effort; a balance failure still returns the
/// wallet.
#[utoipa::path(
    post,
    path = "/api/recipient",
    tag = "Recipient",
    responses(
        (status = 200, description = "Recipient wallet", body = WalletResponse),
        (status = 409, description = "Another action is running"),
        (status = 500, description = "Wallet provider failure")
    )
)]
pub async fn create_recipient(
    State(state): State<AppState>,
) -> Result<Json<WalletResponse>, ApiError> {
    let _guard = state.session.begin(Action::Recipient)?;
    state.session.update(|s| s.tx_result = None);

    let wallet = state.recipients.get_or_create().await.map_err(|e| {
        error!(error = %e, "Failed to create recipient wallet");
        ApiError::from(e)
    })?;
    info!(address = %wallet.address, "Recipient wallet ready");

    let balances = match state.recipients.balances(&wallet).await {
        Ok(balances) => Some(balances),
        Err(e) => {
            warn!(error = %e, "Failed to fetch recipient balances");
            None
        }
    };

    let info = RecipientInfo {
        address: wallet.address,
        chain: wallet.chain,
        balances,
    };
    state.session.update(|s| s.recipient = Some(info.clone()));

    Ok(Json(WalletResponse {
        success: true,
        address: info.address,
        chain: info.chain,
        balances: info.balances,
    }))
}

/// Recipient wallet with fresh balances.
#[utoipa::path(
    get,
    path = "/api/recipient",
    tag = "Recipient",
    responses(
        (status = 200, description = "Recipient wallet", body = WalletResponse),
        (status = 404, description = "Recipient not created yet"),
        (status = 500, description = "Wallet provider failure")
    )
)]
pub async fn get_recipient(State(state): State<AppState>) -> Result<Json<WalletResponse>, ApiError> {
    let info = state.recipients.info().await.map_err(|e| {
        warn!(error = %e, "Recipient lookup failed");
        ApiError::from(e)
    })?;
    state.session.update(|s| s.recipient = Some(info.clone()));

    Ok(Json(WalletResponse {
        success: true,
        address: info.address,
        chain: info.chain,
        balances: info.balances,
    }))
}
