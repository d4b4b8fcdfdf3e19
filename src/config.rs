// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WALLET_SERVER_API_KEY` | Server-side wallet provider key | Required |
//! | `WALLET_CLIENT_API_KEY` | Publishable key handed to the browser | Optional |
//! | `WALLET_API_BASE_URL` | Wallet provider REST base URL | staging |
//! | `WALLET_CHAIN` | Test network for both wallets | `base-sepolia` |
//! | `WALLET_TOKEN` | Token moved by fund and send | `usdxm` |
//! | `FUND_AMOUNT` | Faucet amount per fund action | `10` |
//! | `POLL_ATTEMPTS` | Balance polls after an operation | `10` |
//! | `POLL_INTERVAL_MS` | Delay before each poll | `2000` |
//! | `RECIPIENT_MODE` | `linked` or `singleton` | `linked` |
//! | `RECIPIENT_LINKED_USER` | Logical user owning the recipient | `demo-recipient-wallet` |
//! | `SENDER_LINKED_USER` | Logical user owning the sender | `demo-sender-wallet` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use url::Url;

use crate::reconcile::PollConfig;
use crate::recipient::RecipientMode;
use crate::transfer::DEFAULT_FUND_AMOUNT;
use crate::wallet::{client::DEFAULT_API_BASE_URL, DEFAULT_CHAIN, DEFAULT_TOKEN};

pub const SERVER_API_KEY_ENV: &str = "WALLET_SERVER_API_KEY";
pub const CLIENT_API_KEY_ENV: &str = "WALLET_CLIENT_API_KEY";
pub const API_BASE_URL_ENV: &str = "WALLET_API_BASE_URL";
pub const CHAIN_ENV: &str = "WALLET_CHAIN";
pub const TOKEN_ENV: &str = "WALLET_TOKEN";
pub const FUND_AMOUNT_ENV: &str = "FUND_AMOUNT";
pub const POLL_ATTEMPTS_ENV: &str = "POLL_ATTEMPTS";
pub const POLL_INTERVAL_MS_ENV: &str = "POLL_INTERVAL_MS";
pub const RECIPIENT_MODE_ENV: &str = "RECIPIENT_MODE";
pub const RECIPIENT_LINKED_USER_ENV: &str = "RECIPIENT_LINKED_USER";
pub const SENDER_LINKED_USER_ENV: &str = "SENDER_LINKED_USER";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable selecting `json` or `pretty` log output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_RECIPIENT_LINKED_USER: &str = "demo-recipient-wallet";
pub const DEFAULT_SENDER_LINKED_USER: &str = "demo-sender-wallet";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable `{0}`")]
    Missing(&'static str),

    #[error("Invalid value for `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_api_key: String,
    pub client_api_key: Option<String>,
    pub api_base_url: String,
    pub chain: String,
    pub token: String,
    pub fund_amount: Decimal,
    pub poll: PollConfig,
    pub recipient_mode: RecipientMode,
    pub recipient_linked_user: String,
    pub sender_linked_user: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let server_api_key =
            get(SERVER_API_KEY_ENV).ok_or(ConfigError::Missing(SERVER_API_KEY_ENV))?;

        let fund_amount = match get(FUND_AMOUNT_ENV) {
            Some(raw) => crate::balance::parse_amount(&raw).map_err(|e| ConfigError::Invalid {
                name: FUND_AMOUNT_ENV,
                reason: e.to_string(),
            })?,
            None => Decimal::from(DEFAULT_FUND_AMOUNT),
        };

        let defaults = PollConfig::default();
        let attempts: u32 =
            parse_or(get(POLL_ATTEMPTS_ENV), POLL_ATTEMPTS_ENV, defaults.attempts)?;
        if attempts == 0 {
            return Err(ConfigError::Invalid {
                name: POLL_ATTEMPTS_ENV,
                reason: "must be at least 1".to_string(),
            });
        }
        let interval_ms: u64 = parse_or(
            get(POLL_INTERVAL_MS_ENV),
            POLL_INTERVAL_MS_ENV,
            defaults.interval.as_millis() as u64,
        )?;

        let api_base_url = match get(API_BASE_URL_ENV) {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let recipient_mode = match get(RECIPIENT_MODE_ENV) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: RECIPIENT_MODE_ENV,
                reason,
            })?,
            None => RecipientMode::default(),
        };

        Ok(Self {
            server_api_key,
            client_api_key: get(CLIENT_API_KEY_ENV),
            api_base_url,
            chain: get(CHAIN_ENV).unwrap_or_else(|| DEFAULT_CHAIN.to_string()),
            token: get(TOKEN_ENV)
                .unwrap_or_else(|| DEFAULT_TOKEN.to_string())
                .to_ascii_lowercase(),
            fund_amount,
            poll: PollConfig {
                attempts,
                interval: Duration::from_millis(interval_ms),
            },
            recipient_mode,
            recipient_linked_user: get(RECIPIENT_LINKED_USER_ENV)
                .unwrap_or_else(|| DEFAULT_RECIPIENT_LINKED_USER.to_string()),
            sender_linked_user: get(SENDER_LINKED_USER_ENV)
                .unwrap_or_else(|| DEFAULT_SENDER_LINKED_USER.to_string()),
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?,
        })
    }

    /// Token symbols requested in every balance query.
    pub fn tracked_tokens(&self) -> Vec<String> {
        vec![self.token.clone()]
    }

    /// Configuration with defaults and placeholder keys.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            server_api_key: "sk_test".to_string(),
            client_api_key: Some("ck_test".to_string()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            chain: DEFAULT_CHAIN.to_string(),
            token: DEFAULT_TOKEN.to_string(),
            fund_amount: Decimal::from(DEFAULT_FUND_AMOUNT),
            poll: PollConfig::default(),
            recipient_mode: RecipientMode::Linked,
            recipient_linked_user: DEFAULT_RECIPIENT_LINKED_USER.to_string(),
            sender_linked_user: DEFAULT_SENDER_LINKED_USER.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: API_BASE_URL_ENV,
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
