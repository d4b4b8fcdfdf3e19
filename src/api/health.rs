// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::recipient::RecipientMode;
use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    /// Overall status. Always "ok" while the process serves requests.
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub service: String,
    /// Chain both wallets live on.
    pub chain: String,
    /// Recipient lookup policy ("linked" or "singleton").
    pub recipient_mode: String,
    /// Whether the recipient wallet exists in this process.
    pub recipient: String,
    /// Whether the sender wallet exists in this process.
    pub sender: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn created(present: bool) -> String {
    let status = if present { "created" } else { "pending" };
    status.to_string()
}

/// Health check endpoint handler.
///
/// Reports which wallets exist. Never calls the wallet provider.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthReport)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let recipient_mode = match state.recipients.mode() {
        RecipientMode::Linked => "linked",
        RecipientMode::Singleton => "singleton",
    };

    Json(HealthReport {
        status: "ok".to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            chain: state.config.chain.clone(),
            recipient_mode: recipient_mode.to_string(),
            recipient: created(state.recipients.current().await.is_some()),
            sender: created(state.existing_sender().await.is_some()),
        },
    })
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
