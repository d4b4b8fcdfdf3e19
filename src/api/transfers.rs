// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fund and send endpoints.
//!
//! The operation runs in a task tracked by [`AppState::tasks`], so the
//! balance polling after submission finishes even if the client goes away.
//! The task holds the session's action slot and records the final result in
//! the session itself; the handler only waits for it. A failed operation is
//! reported as a `TxResult` with `success: false` and status 502.

use std::future::Future;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::{error, info};

use crate::{
    balance::parse_amount,
    error::ApiError,
    models::{SendRequest, TransferResponse},
    session::{Action, SessionProgress},
    state::AppState,
    transfer::TransferReport,
};

/// Store the final result and the latest balances in the session.
fn record(state: &AppState, report: &TransferReport) {
    state.session.update(|s| {
        s.tx_result = Some(report.result.clone());
        if let Some(balances) = &report.sender_balances {
            s.sender_balances = Some(balances.clone());
        }
        if let (Some(recipient), Some(balances)) = (&mut s.recipient, &report.recipient_balances) {
            recipient.balances = Some(balances.clone());
        }
    });
}

async fn run_detached<F>(state: &AppState, task: F) -> Result<TransferReport, ApiError>
where
    F: Future<Output = TransferReport> + Send + 'static,
{
    state.tasks.spawn(task).await.map_err(|e| {
        error!(error = %e, "Transfer task failed");
        ApiError::internal("Transfer task failed")
    })
}

fn respond(report: TransferReport) -> (StatusCode, Json<TransferResponse>) {
    let status = if report.result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    (
        status,
        Json(TransferResponse {
            result: report.result,
            sender_balances: report.sender_balances,
            recipient_balances: report.recipient_balances,
        }),
    )
}

/// Credit the sender wallet from the staging faucet.
#[utoipa::path(
    post,
    path = "/api/fund",
    tag = "Transfers",
    responses(
        (status = 200, description = "Faucet transfer submitted", body = TransferResponse),
        (status = 404, description = "Sender not created yet"),
        (status = 409, description = "Another action is running"),
        (status = 502, description = "Wallet provider rejected the operation", body = TransferResponse)
    )
)]
pub async fn fund_sender(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    let guard = state.session.begin(Action::Fund)?;
    let sender = state
        .existing_sender()
        .await
        .ok_or_else(|| ApiError::not_found("Sender wallet not found. Create it first."))?;
    state.session.update(|s| s.tx_result = None);

    let task_state = state.clone();
    let report = run_detached(&state, async move {
        let progress = SessionProgress::new(&guard, Action::RefreshSender);
        let report = task_state.transfers.fund(&sender, &progress).await;
        record(&task_state, &report);
        report
    })
    .await?;
    info!(success = report.result.success, "Fund finished");

    Ok(respond(report))
}

/// Send tokens from the sender to the recipient.
#[utoipa::path(
    post,
    path = "/api/send",
    tag = "Transfers",
    request_body = SendRequest,
    responses(
        (status = 200, description = "Transfer submitted", body = TransferResponse),
        (status = 400, description = "Invalid request body or amount"),
        (status = 404, description = "Sender or recipient not created yet"),
        (status = 409, description = "Another action is running"),
        (status = 502, description = "Wallet provider rejected the operation", body = TransferResponse)
    )
)]
pub async fn send_to_recipient(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TransferResponse>), ApiError> {
    let Json(request) = payload?;
    let amount = parse_amount(&request.amount).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let guard = state.session.begin(Action::Send)?;
    let sender = state
        .existing_sender()
        .await
        .ok_or_else(|| ApiError::not_found("Sender wallet not found. Create it first."))?;
    let recipient = state
        .recipients
        .current()
        .await
        .ok_or_else(|| ApiError::not_found("Recipient wallet not found. Create it first."))?;
    state.session.update(|s| s.tx_result = None);

    let task_state = state.clone();
    let report = run_detached(&state, async move {
        let progress = SessionProgress::new(&guard, Action::RefreshRecipient);
        let report = task_state
            .transfers
            .send(&sender, &recipient, amount, &progress)
            .await;
        record(&task_state, &report);
        report
    })
    .await?;
    info!(success = report.result.success, "Send finished");

    Ok(respond(report))
}
