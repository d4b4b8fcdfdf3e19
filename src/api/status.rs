// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    presentation::{render, StatusView, ViewContext},
    state::AppState,
};

/// Current walkthrough state, one entry per step.
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Status",
    responses(
        (status = 200, description = "Walkthrough view", body = StatusView)
    )
)]
pub async fn get_status(State(state): State<AppState>) -> Json<StatusView> {
    let snapshot = state.session.snapshot();
    let fund_amount = state.config.fund_amount.normalize().to_string();
    let ctx = ViewContext {
        chain: &state.config.chain,
        token: &state.config.token,
        fund_amount: &fund_amount,
        client_api_key: state.config.client_api_key.as_deref(),
    };
    Json(render(&snapshot, &ctx))
}
