// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Reconciliation
//!
//! Settlement on the test network is asynchronous and the wallet provider
//! offers no notification, so after a fund or send we poll the receiving
//! wallet until its balance reaches the expected amount.
//!
//! ## Strategy
//!
//! For up to `attempts` rounds:
//! 1. Sleep `interval`.
//! 2. Re-fetch balances and read the tracked token (missing token = 0).
//! 3. Stop as soon as the amount is `>=` the target. The looser comparison
//!    tolerates unrelated deposits landing in the meantime.
//!
//! Running out of attempts is not an error: the caller receives the last
//! observation and decides what "still below target" means. Fetch errors
//! consume an attempt and are reported in [`Reconciliation::last_error`].

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::balance::token_amount;
use crate::models::{Balances, Settlement, SettlementStatus};
use crate::wallet::{WalletError, WalletHandle, WalletProvider};

/// Default number of polls after an operation.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// Default delay before each poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Something that can be asked for a fresh balance snapshot.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balances(&self) -> Result<Balances, WalletError>;
}

/// Balances of one wallet, read through the provider.
pub struct WalletBalanceSource<'a> {
    pub provider: &'a dyn WalletProvider,
    pub wallet: &'a WalletHandle,
    pub tokens: &'a [String],
}

#[async_trait]
impl BalanceSource for WalletBalanceSource<'_> {
    async fn fetch_balances(&self) -> Result<Balances, WalletError> {
        self.provider.balances(self.wallet, self.tokens).await
    }
}

/// What the loop saw before it stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub settled: bool,
    pub attempts: u32,
    pub observed: Option<Decimal>,
    pub balances: Option<Balances>,
    pub last_error: Option<String>,
}

impl Reconciliation {
    pub fn settlement(&self, expected: Decimal) -> Settlement {
        Settlement {
            status: if self.settled {
                SettlementStatus::Settled
            } else {
                SettlementStatus::Unconfirmed
            },
            expected: expected.normalize().to_string(),
            observed: self.observed.map(|amount| amount.normalize().to_string()),
            attempts: self.attempts,
            last_error: self.last_error.clone(),
        }
    }
}

/// Poll `source` until `symbol` reaches `target` or the budget runs out.
pub async fn reconcile<S>(
    source: &S,
    symbol: &str,
    target: Decimal,
    config: PollConfig,
) -> Reconciliation
where
    S: BalanceSource + ?Sized,
{
    let mut outcome = Reconciliation::default();

    for attempt in 1..=config.attempts {
        tokio::time::sleep(config.interval).await;
        outcome.attempts = attempt;

        match source.fetch_balances().await {
            Ok(balances) => {
                let amount = token_amount(&balances, symbol);
                debug!(
                    attempt,
                    observed = %amount,
                    expected = %target,
                    symbol,
                    "Polled balance"
                );
                outcome.observed = Some(amount);
                outcome.balances = Some(balances);
                outcome.last_error = None;

                if amount >= target {
                    info!(attempt, observed = %amount, symbol, "Balance reached target");
                    outcome.settled = true;
                    return outcome;
                }
            }
            Err(e) => {
                warn!(attempt, error = %e, "Balance poll failed");
                outcome.last_error = Some(e.to_string());
            }
        }
    }

    warn!(
        attempts = outcome.attempts,
        observed = ?outcome.observed,
        expected = %target,
        symbol,
        "Balance did not reach target within polling budget"
    );
    outcome
}
