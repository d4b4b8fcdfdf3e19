// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory wallet provider for tests.
//!
//! Balances are scripted per address: each query pops the next observation,
//! and the last one repeats once the script runs out.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{CreateWalletRequest, TransferReceipt, WalletError, WalletHandle, WalletProvider};
use crate::models::{Balances, TokenBalance};

/// One scripted balance query result.
#[derive(Debug, Clone)]
pub enum Observation {
    Amount(Decimal),
    Absent,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: &'static str,
    pub from: String,
    pub to: Option<String>,
    pub token: String,
    pub amount: Decimal,
}

pub struct FakeWalletProvider {
    token: String,
    linked: Mutex<HashMap<String, WalletHandle>>,
    scripts: Mutex<HashMap<String, VecDeque<Observation>>>,
    balance_calls: Mutex<HashMap<String, usize>>,
    calls: Mutex<Vec<RecordedCall>>,
    create_calls: AtomicUsize,
    create_failures: AtomicUsize,
    next_address: AtomicUsize,
    fund_error: Mutex<Option<String>>,
    send_error: Mutex<Option<String>>,
}

impl FakeWalletProvider {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            linked: Mutex::new(HashMap::new()),
            scripts: Mutex::new(HashMap::new()),
            balance_calls: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            create_failures: AtomicUsize::new(0),
            next_address: AtomicUsize::new(1),
            fund_error: Mutex::new(None),
            send_error: Mutex::new(None),
        }
    }

    /// Address the next created wallet will get.
    pub fn peek_address(&self) -> String {
        format!("0x{:040x}", self.next_address.load(Ordering::SeqCst))
    }

    pub fn script_balances(&self, address: &str, observations: Vec<Observation>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(address.to_string(), observations.into());
    }

    pub fn script_amounts(&self, address: &str, amounts: &[Decimal]) {
        self.script_balances(
            address,
            amounts.iter().copied().map(Observation::Amount).collect(),
        );
    }

    pub fn fail_next_creates(&self, count: usize) {
        self.create_failures.store(count, Ordering::SeqCst);
    }

    pub fn fail_fund(&self, message: &str) {
        *self.fund_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_send(&self, message: &str) {
        *self.send_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self, address: &str) -> usize {
        self.balance_calls
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_observation(&self, address: &str) -> Observation {
        *self
            .balance_calls
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_insert(0) += 1;

        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(address) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Observation::Absent),
            Some(queue) => queue.front().cloned().unwrap_or(Observation::Absent),
            None => Observation::Absent,
        }
    }
}

#[async_trait]
impl WalletProvider for FakeWalletProvider {
    async fn get_or_create_wallet(
        &self,
        request: &CreateWalletRequest,
    ) -> Result<WalletHandle, WalletError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self
            .create_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(WalletError::Status {
                status: 503,
                message: "wallet service unavailable".to_string(),
            });
        }

        if let Some(owner) = &request.linked_user {
            if let Some(existing) = self.linked.lock().unwrap().get(owner) {
                return Ok(existing.clone());
            }
        }

        let n = self.next_address.fetch_add(1, Ordering::SeqCst);
        let wallet = WalletHandle {
            address: format!("0x{n:040x}"),
            chain: request.chain.clone(),
            owner: request.linked_user.clone(),
        };
        if let Some(owner) = &request.linked_user {
            self.linked
                .lock()
                .unwrap()
                .insert(owner.clone(), wallet.clone());
        }
        Ok(wallet)
    }

    async fn balances(
        &self,
        wallet: &WalletHandle,
        _tokens: &[String],
    ) -> Result<Balances, WalletError> {
        let mut tokens = vec![TokenBalance::new("usdc", "0")];
        match self.next_observation(&wallet.address) {
            Observation::Amount(amount) => tokens.push(TokenBalance {
                amount: amount.to_string(),
                symbol: self.token.to_ascii_uppercase(),
                name: Some("Test USD".to_string()),
            }),
            Observation::Absent => {}
            Observation::Error(message) => return Err(WalletError::Request(message)),
        }

        Ok(Balances {
            native_token: TokenBalance::new("eth", "0.01"),
            usdc: Some(TokenBalance::new("usdc", "0")),
            tokens,
        })
    }

    async fn fund(
        &self,
        wallet: &WalletHandle,
        token: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError> {
        if let Some(message) = self.fund_error.lock().unwrap().clone() {
            return Err(WalletError::Request(message));
        }
        self.calls.lock().unwrap().push(RecordedCall {
            op: "fund",
            from: wallet.address.clone(),
            to: None,
            token: token.to_string(),
            amount,
        });
        Ok(TransferReceipt {
            tx_id: Some("fund-1".to_string()),
            ..TransferReceipt::default()
        })
    }

    async fn send(
        &self,
        wallet: &WalletHandle,
        to: &str,
        token: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError> {
        if let Some(message) = self.send_error.lock().unwrap().clone() {
            return Err(WalletError::Status {
                status: 400,
                message,
            });
        }
        self.calls.lock().unwrap().push(RecordedCall {
            op: "send",
            from: wallet.address.clone(),
            to: Some(to.to_string()),
            token: token.to_string(),
            amount,
        });
        Ok(TransferReceipt {
            hash: Some("0xfeed".to_string()),
            explorer_link: Some("https://sepolia.basescan.org/tx/0xfeed".to_string()),
            tx_id: Some("send-1".to_string()),
        })
    }
}
