// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        Balances, RecipientInfo, SendRequest, Settlement, SettlementStatus, TokenBalance,
        TransferResponse, TxKind, TxResult, WalletResponse,
    },
    presentation::{ResultView, StatusView, StepView},
    session::Action,
    state::AppState,
};

pub mod health;
pub mod recipient;
pub mod sender;
pub mod status;
pub mod transfers;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/recipient",
            get(recipient::get_recipient).post(recipient::create_recipient),
        )
        .route(
            "/sender",
            get(sender::get_sender).post(sender::create_sender),
        )
        .route("/fund", post(transfers::fund_sender))
        .route("/send", post(transfers::send_to_recipient))
        .route("/status", get(status::get_status));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        recipient::create_recipient,
        recipient::get_recipient,
        sender::create_sender,
        sender::get_sender,
        transfers::fund_sender,
        transfers::send_to_recipient,
        status::get_status,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            TokenBalance,
            Balances,
            RecipientInfo,
            WalletResponse,
            TxKind,
            SettlementStatus,
            Settlement,
            TxResult,
            SendRequest,
            TransferResponse,
            Action,
            StepView,
            ResultView,
            StatusView,
            health::HealthReport,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Sender", description = "Sender wallet"),
        (name = "Recipient", description = "Server-held recipient wallet"),
        (name = "Transfers", description = "Faucet funding and token transfers"),
        (name = "Status", description = "Walkthrough progress"),
        (name = "Health", description = "Liveness checks")
    )
)]
struct ApiDoc;
