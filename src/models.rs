// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. Field names are
//! camelCase on the wire (`nativeToken`, `explorerLink`, `txId`) so the
//! browser client can consume them without remapping.
//!
//! ## Model Categories
//!
//! - **Balances**: per-wallet snapshot of native, stable-coin and other tokens
//! - **Recipient**: the server-held wallet and its latest balances
//! - **Transactions**: the outcome of the most recent fund or send action

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::wallet::TransferReceipt;

// =============================================================================
// Balance Models
// =============================================================================

/// A single token balance as reported by the wallet provider.
///
/// `amount` is kept as the provider's decimal string. Compare balances with
/// [`crate::balance::token_amount`], never on the string itself.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenBalance {
    /// Decimal amount, e.g. `"7.5"`.
    pub amount: String,
    /// Token symbol, e.g. `"usdxm"`.
    pub symbol: String,
    /// Human-readable token name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TokenBalance {
    pub fn new(symbol: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            symbol: symbol.into(),
            name: None,
        }
    }
}

/// Balance snapshot for one wallet.
///
/// `tokens` may also contain a copy of `usdc`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    pub native_token: TokenBalance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdc: Option<TokenBalance>,
    #[serde(default)]
    pub tokens: Vec<TokenBalance>,
}

// =============================================================================
// Recipient Models
// =============================================================================

/// Server-held recipient wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecipientInfo {
    pub address: String,
    pub chain: String,
    /// Last fetched balances. May lag behind the chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<Balances>,
}

/// Response for wallet creation and lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletResponse {
    pub success: bool,
    pub address: String,
    pub chain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<Balances>,
}

// =============================================================================
// Transaction Models
// =============================================================================

/// Which action produced a [`TxResult`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Fund,
    Send,
}

/// Whether the receiving balance reached the expected amount while polling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Settled,
    Unconfirmed,
}

/// Post-submission observation, reported separately from the submission
/// itself so a slow network never turns a sent transfer into a failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub status: SettlementStatus,
    /// Balance the receiving wallet must reach.
    pub expected: String,
    /// Last balance seen while polling, if any poll succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<String>,
    /// Number of polls performed.
    pub attempts: u32,
    /// Error from the last failed poll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Outcome of the most recent fund or send action.
///
/// Successful results carry `type` and `amount`; failed results carry only
/// `error`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    pub success: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TxKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Settlement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TxResult {
    /// Result for an operation the provider accepted.
    pub fn submitted(kind: TxKind, amount: impl Into<String>, receipt: TransferReceipt) -> Self {
        Self {
            success: true,
            kind: Some(kind),
            amount: Some(amount.into()),
            hash: receipt.hash,
            explorer_link: receipt.explorer_link,
            tx_id: receipt.tx_id,
            settlement: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            kind: None,
            amount: None,
            hash: None,
            explorer_link: None,
            tx_id: None,
            settlement: None,
            error: Some(error.into()),
        }
    }
}

/// Request body for `POST /api/send`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendRequest {
    /// Amount in whole tokens as a decimal string, e.g. `"2.5"`.
    pub amount: String,
}

/// Response for fund and send endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    #[serde(flatten)]
    pub result: TxResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_balances: Option<Balances>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_balances: Option<Balances>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn balances_use_camel_case_on_the_wire() {
        let balances = Balances {
            native_token: TokenBalance::new("eth", "0.01"),
            usdc: None,
            tokens: vec![TokenBalance::new("usdxm", "5")],
        };

        let value = serde_json::to_value(&balances).unwrap();
        assert_eq!(value["nativeToken"]["symbol"], "eth");
        assert!(value.get("usdc").is_none());
        assert_eq!(value["tokens"][0]["amount"], "5");
    }

    #[test]
    fn balances_accept_missing_tokens_and_usdc() {
        let balances: Balances = serde_json::from_value(json!({
            "nativeToken": { "amount": "0", "symbol": "eth" }
        }))
        .unwrap();
        assert!(balances.usdc.is_none());
        assert!(balances.tokens.is_empty());
    }

    #[test]
    fn submitted_result_serializes_type_and_links() {
        let receipt = TransferReceipt {
            hash: Some("0xabc".into()),
            explorer_link: Some("https://sepolia.basescan.org/tx/0xabc".into()),
            tx_id: None,
        };
        let result = TxResult::submitted(TxKind::Send, "2.5", receipt);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["type"], "send");
        assert_eq!(value["amount"], "2.5");
        assert_eq!(value["explorerLink"], "https://sepolia.basescan.org/tx/0xabc");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failed_result_only_carries_error() {
        let value = serde_json::to_value(TxResult::failed("insufficient funds")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "insufficient funds" }));
    }
}
