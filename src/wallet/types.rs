// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default test network.
pub const DEFAULT_CHAIN: &str = "base-sepolia";

/// Token moved by the fund and send actions.
pub const DEFAULT_TOKEN: &str = "usdxm";

/// Locator for a wallet held by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletHandle {
    /// On-chain address.
    pub address: String,
    /// Chain the wallet was created on.
    pub chain: String,
    /// Owner locator (`user:<id>`) for linked wallets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Parameters for wallet creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWalletRequest {
    pub chain: String,
    /// Owner locator. When set, creation is idempotent: the provider returns
    /// the same wallet for the same linked user.
    pub linked_user: Option<String>,
}

impl CreateWalletRequest {
    pub fn linked(chain: impl Into<String>, user_id: &str) -> Self {
        Self {
            chain: chain.into(),
            linked_user: Some(linked_user_locator(user_id)),
        }
    }

    pub fn unlinked(chain: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            linked_user: None,
        }
    }
}

/// Owner locator for a logical user id.
pub fn linked_user_locator(user_id: &str) -> String {
    if user_id.starts_with("user:") {
        user_id.to_string()
    } else {
        format!("user:{user_id}")
    }
}

/// What the provider returned for an accepted fund or send.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_link: Option<String>,
    /// Provider-side transaction id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
}

/// Wallet provider errors. Only a message is surfaced to API callers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    #[error("Wallet provider configuration missing: {0}")]
    MissingConfig(String),

    #[error("Wallet provider request failed: {0}")]
    Request(String),

    #[error("Wallet provider returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Wallet provider response was invalid: {0}")]
    InvalidResponse(String),
}
