// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Walkthrough view derived from [`SessionState`].
//!
//! Each step reports whether its action is available and what to show. The
//! view holds no state of its own.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Balances, SettlementStatus, TxKind, TxResult};
use crate::session::{Action, SessionState};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub step: u8,
    pub title: String,
    /// Whether the step's action can be triggered now.
    pub enabled: bool,
    /// Whether the step's action is running.
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balances: Option<Balances>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub success: bool,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub chain: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_api_key: Option<String>,
    pub steps: Vec<StepView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
}

pub struct ViewContext<'a> {
    pub chain: &'a str,
    pub token: &'a str,
    pub fund_amount: &'a str,
    pub client_api_key: Option<&'a str>,
}

pub fn render(state: &SessionState, ctx: &ViewContext<'_>) -> StatusView {
    let symbol = ctx.token.to_ascii_uppercase();
    let busy = |action: Action| state.loading == Some(action);
    let has_sender = state.sender.is_some();
    let has_recipient = state.recipient.is_some();
    let can_transfer = has_sender && has_recipient && state.loading.is_none();

    let sender_step = StepView {
        step: 1,
        title: "Sender Wallet".to_string(),
        enabled: state.loading.is_none() && !has_sender,
        busy: busy(Action::Sender) || busy(Action::RefreshSender),
        address: state.sender.as_ref().map(|w| w.address.clone()),
        balances: state.sender_balances.clone(),
        message: match (&state.sender, busy(Action::Sender)) {
            (_, true) => "Creating...".to_string(),
            (Some(_), false) => "Wallet Created".to_string(),
            (None, false) => "Create the sender wallet".to_string(),
        },
    };

    let recipient_step = StepView {
        step: 2,
        title: "Recipient Wallet".to_string(),
        enabled: has_sender && state.loading.is_none() && !has_recipient,
        busy: busy(Action::Recipient) || busy(Action::RefreshRecipient),
        address: state.recipient.as_ref().map(|r| r.address.clone()),
        balances: state.recipient.as_ref().and_then(|r| r.balances.clone()),
        message: if busy(Action::Recipient) {
            "Creating...".to_string()
        } else if has_recipient {
            "Wallet Created".to_string()
        } else {
            "Create a recipient wallet on the server using API key authentication".to_string()
        },
    };

    let fund_step = StepView {
        step: 3,
        title: "Fund Sender Wallet".to_string(),
        enabled: can_transfer,
        busy: busy(Action::Fund),
        address: None,
        balances: None,
        message: if busy(Action::Fund) {
            "Funding...".to_string()
        } else {
            format!("Get {} {symbol}", ctx.fund_amount)
        },
    };

    let send_step = StepView {
        step: 4,
        title: "Send Transaction".to_string(),
        enabled: can_transfer,
        busy: busy(Action::Send),
        address: state.recipient.as_ref().map(|r| r.address.clone()),
        balances: None,
        message: if busy(Action::Send) {
            "Sending...".to_string()
        } else if has_recipient {
            format!("Send {symbol}")
        } else {
            "Create recipient first".to_string()
        },
    };

    StatusView {
        chain: ctx.chain.to_string(),
        token: symbol.clone(),
        loading: state.loading,
        client_api_key: ctx.client_api_key.map(str::to_string),
        steps: vec![sender_step, recipient_step, fund_step, send_step],
        result: state
            .tx_result
            .as_ref()
            .map(|result| render_result(result, state.loading, &symbol)),
    }
}

fn render_result(result: &TxResult, loading: Option<Action>, symbol: &str) -> ResultView {
    if !result.success {
        return ResultView {
            success: false,
            headline: "Failed".to_string(),
            progress: None,
            hash: None,
            tx_id: None,
            explorer_link: None,
            error: result.error.clone(),
        };
    }

    let amount = result.amount.as_deref().unwrap_or("?");
    let (headline, party, polling) = match result.kind {
        Some(TxKind::Fund) => (
            format!("Funded {amount} {symbol}!"),
            "Sender",
            Action::RefreshSender,
        ),
        _ => (
            format!("Sent {amount} {symbol}!"),
            "Recipient",
            Action::RefreshRecipient,
        ),
    };

    let progress = if loading == Some(polling) {
        Some(format!(
            "Waiting for {} balance to update...",
            party.to_ascii_lowercase()
        ))
    } else {
        result.settlement.as_ref().map(|s| match s.status {
            SettlementStatus::Settled => format!("{party} balance updated"),
            SettlementStatus::Unconfirmed => format!(
                "{party} balance not updated after {} checks; the transfer may still settle",
                s.attempts
            ),
        })
    };

    ResultView {
        success: true,
        headline,
        progress,
        hash: result.hash.clone(),
        tx_id: result.tx_id.clone(),
        explorer_link: result.explorer_link.clone(),
        error: None,
    }
}
