// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transfer Orchestration
//!
//! Fund and send follow the same five steps:
//!
//! 1. Read the receiving wallet's token amount and compute
//!    `expected = current + delta`.
//! 2. Submit the operation to the wallet provider.
//! 3. Refresh the initiating wallet's balance (send only, best effort).
//! 4. Poll the receiving wallet until `expected` is reached
//!    (see [`crate::reconcile`]).
//! 5. Report a [`TxResult`].
//!
//! Failures in steps 1-2 produce a failed result. Once the provider accepted
//! the operation the result stays successful, keeping the hash and explorer
//! link, and its `settlement` says whether polling saw the new balance.
//! There is no cancellation: a started operation polls until it settles or
//! the budget runs out.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::balance::token_amount;
use crate::models::{Balances, TxKind, TxResult};
use crate::reconcile::{reconcile, PollConfig, WalletBalanceSource};
use crate::wallet::{WalletHandle, WalletProvider};

/// Default faucet amount, in whole tokens.
pub const DEFAULT_FUND_AMOUNT: u32 = 10;

const OVERFLOW_ERROR: &str = "Amount is too large for the current balance";

/// Hooks for reporting progress while an operation runs.
pub trait TransferObserver: Send + Sync {
    /// The provider accepted the operation; polling starts next.
    fn submitted(&self, _result: &TxResult) {}

    /// The initiating wallet's balance was refreshed after submission.
    fn sender_refreshed(&self, _balances: &Balances) {}
}

/// Observer that ignores every event.
pub struct NoopObserver;

impl TransferObserver for NoopObserver {}

/// Final result plus the latest balances seen for each side.
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub result: TxResult,
    pub sender_balances: Option<Balances>,
    pub recipient_balances: Option<Balances>,
}

impl TransferReport {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            result: TxResult::failed(error),
            sender_balances: None,
            recipient_balances: None,
        }
    }
}

pub struct TransferOrchestrator {
    provider: Arc<dyn WalletProvider>,
    token: String,
    tracked_tokens: Vec<String>,
    fund_amount: Decimal,
    poll: PollConfig,
}

impl TransferOrchestrator {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        token: impl Into<String>,
        fund_amount: Decimal,
        poll: PollConfig,
    ) -> Self {
        let token = token.into();
        Self {
            provider,
            tracked_tokens: vec![token.clone()],
            token,
            fund_amount,
            poll,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn fund_amount(&self) -> Decimal {
        self.fund_amount
    }

    pub fn poll_config(&self) -> PollConfig {
        self.poll
    }

    async fn snapshot(&self, wallet: &WalletHandle) -> Result<(Balances, Decimal), String> {
        let balances = self
            .provider
            .balances(wallet, &self.tracked_tokens)
            .await
            .map_err(|e| e.to_string())?;
        let amount = token_amount(&balances, &self.token);
        Ok((balances, amount))
    }

    /// Credit the sender from the staging faucet and wait for the credit.
    #[instrument(skip_all, fields(wallet = %sender.address))]
    pub async fn fund(
        &self,
        sender: &WalletHandle,
        observer: &dyn TransferObserver,
    ) -> TransferReport {
        let (before, current) = match self.snapshot(sender).await {
            Ok(snapshot) => snapshot,
            Err(e) => return TransferReport::failed(e),
        };
        let Some(expected) = current.checked_add(self.fund_amount) else {
            return TransferReport::failed(OVERFLOW_ERROR);
        };
        info!(current = %current, expected = %expected, "Funding sender wallet");

        let receipt = match self
            .provider
            .fund(sender, &self.token, self.fund_amount)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Faucet funding failed");
                return TransferReport::failed(e.to_string());
            }
        };

        let mut result = TxResult::submitted(
            TxKind::Fund,
            self.fund_amount.normalize().to_string(),
            receipt,
        );
        observer.submitted(&result);

        let source = WalletBalanceSource {
            provider: self.provider.as_ref(),
            wallet: sender,
            tokens: &self.tracked_tokens,
        };
        let outcome = reconcile(&source, &self.token, expected, self.poll).await;
        result.settlement = Some(outcome.settlement(expected));

        TransferReport {
            result,
            sender_balances: outcome.balances.or(Some(before)),
            recipient_balances: None,
        }
    }

    /// Send `amount` from the sender to the recipient and wait for the credit.
    #[instrument(skip_all, fields(from = %sender.address, to = %recipient.address, amount = %amount))]
    pub async fn send(
        &self,
        sender: &WalletHandle,
        recipient: &WalletHandle,
        amount: Decimal,
        observer: &dyn TransferObserver,
    ) -> TransferReport {
        let (before, current) = match self.snapshot(recipient).await {
            Ok(snapshot) => snapshot,
            Err(e) => return TransferReport::failed(e),
        };
        let Some(expected) = current.checked_add(amount) else {
            warn!(current = %current, "Expected balance overflows");
            return TransferReport::failed(OVERFLOW_ERROR);
        };
        info!(current = %current, expected = %expected, "Sending to recipient wallet");

        let receipt = match self
            .provider
            .send(sender, &recipient.address, &self.token, amount)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Transfer submission failed");
                return TransferReport::failed(e.to_string());
            }
        };

        let mut result =
            TxResult::submitted(TxKind::Send, amount.normalize().to_string(), receipt);
        observer.submitted(&result);

        let sender_balances = match self.provider.balances(sender, &self.tracked_tokens).await {
            Ok(balances) => {
                observer.sender_refreshed(&balances);
                Some(balances)
            }
            Err(e) => {
                warn!(error = %e, "Failed to refresh sender balances");
                None
            }
        };

        let source = WalletBalanceSource {
            provider: self.provider.as_ref(),
            wallet: recipient,
            tokens: &self.tracked_tokens,
        };
        let outcome = reconcile(&source, &self.token, expected, self.poll).await;
        result.settlement = Some(outcome.settlement(expected));

        TransferReport {
            result,
            sender_balances,
            recipient_balances: outcome.balances.or(Some(before)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SettlementStatus;
    use crate::wallet::fake::{FakeWalletProvider, Observation};
    use crate::wallet::CreateWalletRequest;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingObserver {
        submitted: Mutex<Vec<TxResult>>,
        refreshed: Mutex<usize>,
    }

    impl TransferObserver for RecordingObserver {
        fn submitted(&self, result: &TxResult) {
            self.submitted.lock().unwrap().push(result.clone());
        }

        fn sender_refreshed(&self, _balances: &Balances) {
            *self.refreshed.lock().unwrap() += 1;
        }
    }

    async fn setup() -> (Arc<FakeWalletProvider>, TransferOrchestrator, WalletHandle, WalletHandle) {
        let provider = Arc::new(FakeWalletProvider::new("usdxm"));
        let sender = provider
            .get_or_create_wallet(&CreateWalletRequest::linked("base-sepolia", "sender"))
            .await
            .unwrap();
        let recipient = provider
            .get_or_create_wallet(&CreateWalletRequest::linked("base-sepolia", "recipient"))
            .await
            .unwrap();
        let orchestrator = TransferOrchestrator::new(
            provider.clone(),
            "usdxm",
            Decimal::from(DEFAULT_FUND_AMOUNT),
            PollConfig::default(),
        );
        (provider, orchestrator, sender, recipient)
    }

    #[tokio::test(start_paused = true)]
    async fn fund_polls_sender_until_credit_lands() {
        let (provider, orchestrator, sender, _) = setup().await;
        // Snapshot, then polls 1-3.
        provider.script_amounts(&sender.address, &[dec!(0), dec!(0), dec!(0), dec!(10)]);
        let observer = RecordingObserver::default();

        let report = orchestrator.fund(&sender, &observer).await;

        assert!(report.result.success);
        assert_eq!(report.result.kind, Some(TxKind::Fund));
        assert_eq!(report.result.amount.as_deref(), Some("10"));
        let settlement = report.result.settlement.unwrap();
        assert_eq!(settlement.status, SettlementStatus::Settled);
        assert_eq!(settlement.attempts, 3);
        assert_eq!(settlement.observed.as_deref(), Some("10"));
        assert_eq!(
            token_amount(&report.sender_balances.unwrap(), "usdxm"),
            dec!(10)
        );
        assert_eq!(provider.balance_calls(&sender.address), 4);
        assert_eq!(observer.submitted.lock().unwrap().len(), 1);
        assert_eq!(*observer.refreshed.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn send_reports_hash_and_settles_on_recipient() {
        let (provider, orchestrator, sender, recipient) = setup().await;
        provider.script_amounts(&recipient.address, &[dec!(5), dec!(5), dec!(5), dec!(7.5)]);
        provider.script_amounts(&sender.address, &[dec!(7.5)]);
        let observer = RecordingObserver::default();

        let report = orchestrator
            .send(&sender, &recipient, dec!(2.5), &observer)
            .await;

        let result = report.result;
        assert!(result.success);
        assert_eq!(result.kind, Some(TxKind::Send));
        assert_eq!(result.amount.as_deref(), Some("2.5"));
        assert_eq!(result.hash.as_deref(), Some("0xfeed"));
        assert!(result.explorer_link.is_some());
        let settlement = result.settlement.unwrap();
        assert_eq!(settlement.status, SettlementStatus::Settled);
        assert_eq!(settlement.expected, "7.5");
        assert_eq!(settlement.attempts, 3);

        assert_eq!(*observer.refreshed.lock().unwrap(), 1);
        assert!(report.sender_balances.is_some());

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to.as_deref(), Some(recipient.address.as_str()));
        assert_eq!(calls[0].amount, dec!(2.5));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_polling_keeps_success_and_last_observed_balance() {
        let (provider, orchestrator, sender, recipient) = setup().await;
        provider.script_amounts(&recipient.address, &[dec!(5)]);

        let report = orchestrator
            .send(&sender, &recipient, dec!(1), &NoopObserver)
            .await;

        assert!(report.result.success);
        assert!(report.result.hash.is_some());
        let settlement = report.result.settlement.unwrap();
        assert_eq!(settlement.status, SettlementStatus::Unconfirmed);
        assert_eq!(settlement.attempts, 10);
        assert_eq!(settlement.observed.as_deref(), Some("5"));
        assert_eq!(
            token_amount(&report.recipient_balances.unwrap(), "usdxm"),
            dec!(5)
        );
        // Snapshot plus ten polls.
        assert_eq!(provider.balance_calls(&recipient.address), 11);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_errors_do_not_turn_a_sent_transfer_into_a_failure() {
        let (provider, orchestrator, sender, recipient) = setup().await;
        provider.script_balances(
            &recipient.address,
            vec![
                Observation::Amount(dec!(0)),
                Observation::Error("rate limited".into()),
            ],
        );

        let report = orchestrator
            .send(&sender, &recipient, dec!(1), &NoopObserver)
            .await;

        assert!(report.result.success);
        assert_eq!(report.result.hash.as_deref(), Some("0xfeed"));
        let settlement = report.result.settlement.unwrap();
        assert_eq!(settlement.status, SettlementStatus::Unconfirmed);
        assert!(settlement.observed.is_none());
        assert!(settlement.last_error.unwrap().contains("rate limited"));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_token_counts_as_zero_for_expected_amount() {
        let (provider, orchestrator, sender, _) = setup().await;
        provider.script_balances(
            &sender.address,
            vec![Observation::Absent, Observation::Amount(dec!(10))],
        );

        let report = orchestrator.fund(&sender, &NoopObserver).await;

        let settlement = report.result.settlement.unwrap();
        assert_eq!(settlement.expected, "10");
        assert_eq!(settlement.status, SettlementStatus::Settled);
        assert_eq!(settlement.attempts, 1);
    }

    #[tokio::test]
    async fn snapshot_failure_fails_before_submission() {
        let (provider, orchestrator, sender, recipient) = setup().await;
        provider.script_balances(
            &recipient.address,
            vec![Observation::Error("unreachable".into())],
        );

        let report = orchestrator
            .send(&sender, &recipient, dec!(1), &NoopObserver)
            .await;

        assert!(!report.result.success);
        assert!(report.result.error.unwrap().contains("unreachable"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn submission_failure_is_reported_without_polling() {
        let (provider, orchestrator, sender, recipient) = setup().await;
        provider.fail_send("insufficient balance");
        let observer = RecordingObserver::default();

        let report = orchestrator
            .send(&sender, &recipient, dec!(1), &observer)
            .await;

        assert!(!report.result.success);
        assert!(report
            .result
            .error
            .unwrap()
            .contains("insufficient balance"));
        assert!(observer.submitted.lock().unwrap().is_empty());
        assert_eq!(provider.balance_calls(&recipient.address), 1);
    }

    #[tokio::test]
    async fn overflowing_expected_balance_fails_before_submission() {
        let (provider, orchestrator, sender, recipient) = setup().await;
        provider.script_amounts(&recipient.address, &[dec!(5)]);

        let report = orchestrator
            .send(&sender, &recipient, Decimal::MAX, &NoopObserver)
            .await;

        assert!(!report.result.success);
        assert!(report.result.error.unwrap().contains("too large"));
        assert!(provider.calls().is_empty());

        provider.script_amounts(&sender.address, &[Decimal::MAX]);
        let report = orchestrator.fund(&sender, &NoopObserver).await;

        assert!(!report.result.success);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn fund_failure_is_reported() {
        let (provider, orchestrator, sender, _) = setup().await;
        provider.fail_fund("faucet disabled");

        let report = orchestrator.fund(&sender, &NoopObserver).await;

        assert!(!report.result.success);
        assert!(report.result.error.unwrap().contains("faucet disabled"));
    }
}
