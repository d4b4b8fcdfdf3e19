// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! REST client for the hosted wallet service (staging environment).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{CreateWalletRequest, TransferReceipt, WalletError, WalletHandle, WalletProvider};
use crate::models::{Balances, TokenBalance};

pub const DEFAULT_API_BASE_URL: &str = "https://staging.crossmint.com/api";
const WALLETS_API_VERSION: &str = "2025-06-09";
const FAUCET_API_VERSION: &str = "v1-alpha2";
const API_KEY_HEADER: &str = "X-API-KEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Native token symbol on the EVM test networks.
const NATIVE_SYMBOL: &str = "eth";
const USDC_SYMBOL: &str = "usdc";

#[derive(Debug, Clone)]
pub struct WalletApiClient {
    api_base_url: String,
    api_key: String,
    http: Client,
}

impl WalletApiClient {
    pub fn new(
        api_base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, WalletError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(WalletError::MissingConfig("server API key".to_string()));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WalletError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http,
        })
    }

    fn wallets_url(&self, suffix: &str) -> String {
        format!("{}/{WALLETS_API_VERSION}/wallets{suffix}", self.api_base_url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, WalletError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| WalletError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WalletError::Request(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(WalletError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| WalletError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl WalletProvider for WalletApiClient {
    async fn get_or_create_wallet(
        &self,
        request: &CreateWalletRequest,
    ) -> Result<WalletHandle, WalletError> {
        let mut payload = json!({
            "chainType": "evm",
            "type": "smart",
            "config": {
                "adminSigner": { "type": "api-key" }
            }
        });
        if let Some(owner) = &request.linked_user {
            payload["owner"] = Value::String(owner.clone());
        }

        let response = self
            .execute(self.http.post(self.wallets_url("")).json(&payload))
            .await?;
        let wallet = parse_wallet(&response, &request.chain)?;

        info!(
            address = %wallet.address,
            owner = ?wallet.owner,
            "Wallet provider returned wallet"
        );
        Ok(wallet)
    }

    async fn balances(
        &self,
        wallet: &WalletHandle,
        tokens: &[String],
    ) -> Result<Balances, WalletError> {
        let token_list = requested_tokens(tokens).join(",");
        let url = self.wallets_url(&format!("/{}/balances", wallet.address));

        let response = self
            .execute(
                self.http
                    .get(url)
                    .query(&[("chains", wallet.chain.as_str()), ("tokens", token_list.as_str())]),
            )
            .await?;

        let balances = parse_balances(&response)?;
        debug!(
            address = %wallet.address,
            tokens = balances.tokens.len(),
            "Fetched wallet balances"
        );
        Ok(balances)
    }

    async fn fund(
        &self,
        wallet: &WalletHandle,
        token: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError> {
        let url = format!(
            "{}/{FAUCET_API_VERSION}/wallets/{}/balances",
            self.api_base_url, wallet.address
        );
        // The faucet takes a JSON number, not a decimal string.
        let amount_value: serde_json::Number = amount
            .normalize()
            .to_string()
            .parse()
            .map_err(|e| WalletError::Request(format!("invalid fund amount: {e}")))?;
        let payload = json!({
            "amount": amount_value,
            "token": token,
            "chain": wallet.chain,
        });

        let response = self.execute(self.http.post(url).json(&payload)).await?;
        Ok(parse_receipt(&response))
    }

    async fn send(
        &self,
        wallet: &WalletHandle,
        to: &str,
        token: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError> {
        let url = self.wallets_url(&format!(
            "/{}/tokens/{}:{}/transfers",
            wallet.address, wallet.chain, token
        ));
        let payload = json!({
            "recipient": to,
            "amount": amount.normalize().to_string(),
        });

        let response = self.execute(self.http.post(url).json(&payload)).await?;
        let receipt = parse_receipt(&response);
        if receipt.hash.is_none() && receipt.tx_id.is_none() {
            return Err(WalletError::InvalidResponse(
                "missing transaction reference in transfer response".to_string(),
            ));
        }
        Ok(receipt)
    }
}

/// Native and usdc are always requested; extras are appended once each.
fn requested_tokens(extra: &[String]) -> Vec<String> {
    let mut tokens = vec![NATIVE_SYMBOL.to_string(), USDC_SYMBOL.to_string()];
    for token in extra {
        let token = token.to_ascii_lowercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

fn parse_wallet(response: &Value, chain: &str) -> Result<WalletHandle, WalletError> {
    let address = response
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| WalletError::InvalidResponse("missing wallet address".to_string()))?;

    Ok(WalletHandle {
        address: address.to_string(),
        chain: chain.to_string(),
        owner: response
            .get("owner")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

fn parse_token(entry: &Value) -> Option<TokenBalance> {
    let symbol = entry.get("symbol").and_then(Value::as_str)?;
    let amount = entry
        .get("amount")
        .or_else(|| entry.pointer("/balances/total"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "0".to_string());

    Some(TokenBalance {
        amount,
        symbol: symbol.to_string(),
        name: entry.get("name").and_then(Value::as_str).map(str::to_string),
    })
}

fn parse_balances(response: &Value) -> Result<Balances, WalletError> {
    let entries = response
        .as_array()
        .or_else(|| response.get("balances").and_then(Value::as_array))
        .or_else(|| response.get("tokens").and_then(Value::as_array))
        .ok_or_else(|| WalletError::InvalidResponse("expected a list of balances".to_string()))?;

    let mut native_token = None;
    let mut usdc = None;
    let mut tokens = Vec::new();

    for token in entries.iter().filter_map(parse_token) {
        if token.symbol.eq_ignore_ascii_case(NATIVE_SYMBOL) {
            native_token = Some(token);
            continue;
        }
        if token.symbol.eq_ignore_ascii_case(USDC_SYMBOL) {
            usdc = Some(token.clone());
        }
        tokens.push(token);
    }

    Ok(Balances {
        native_token: native_token.unwrap_or_else(|| TokenBalance::new(NATIVE_SYMBOL, "0")),
        usdc,
        tokens,
    })
}

fn string_at(response: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .find_map(|p| response.pointer(p).and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_receipt(response: &Value) -> TransferReceipt {
    TransferReceipt {
        hash: string_at(
            response,
            &["/onChain/txId", "/onChain/transactionHash", "/hash", "/transactionHash"],
        ),
        explorer_link: string_at(response, &["/onChain/explorerLink", "/explorerLink"]),
        tx_id: string_at(response, &["/id", "/txId"]),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| string_at(&value, &["/message", "/error", "/error/message"]))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}
