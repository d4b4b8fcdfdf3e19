// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo session state.
//!
//! Holds what the walkthrough has produced so far (sender wallet, recipient
//! info, latest balances, latest result) and which action is running. Only
//! one action may run at a time: [`DemoSession::begin`] hands out an
//! [`ActionGuard`] and refuses a second one until the first is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Balances, RecipientInfo, TxResult};
use crate::transfer::TransferObserver;
use crate::wallet::WalletHandle;

/// User actions, and the polling phases that follow fund and send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Sender,
    Recipient,
    Fund,
    Send,
    RefreshSender,
    RefreshRecipient,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Another action is in progress ({0:?}). Try again when it finishes.")]
pub struct SessionBusy(pub Action);

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub loading: Option<Action>,
    pub sender: Option<WalletHandle>,
    pub sender_balances: Option<Balances>,
    pub recipient: Option<RecipientInfo>,
    pub tx_result: Option<TxResult>,
}

#[derive(Debug, Default)]
pub struct DemoSession {
    state: Mutex<SessionState>,
}

impl DemoSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `action` as running, or fail if another action is.
    ///
    /// The guard owns a handle to the session so it can move into a
    /// spawned task.
    pub fn begin(self: &Arc<Self>, action: Action) -> Result<ActionGuard, SessionBusy> {
        let mut state = self.lock();
        if let Some(running) = state.loading {
            return Err(SessionBusy(running));
        }
        state.loading = Some(action);
        Ok(ActionGuard {
            session: Arc::clone(self),
        })
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.lock());
    }
}

/// Running action. Clears the loading flag when dropped.
#[must_use = "the action ends when the guard is dropped"]
pub struct ActionGuard {
    session: Arc<DemoSession>,
}

impl ActionGuard {
    /// Switch the loading flag to a follow-up phase, e.g. polling after a send.
    pub fn phase(&self, action: Action) {
        self.session.update(|state| state.loading = Some(action));
    }

    pub fn session(&self) -> &DemoSession {
        &self.session
    }
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.session.update(|state| state.loading = None);
    }
}

/// Mirrors transfer progress into the session while the action runs.
pub struct SessionProgress<'a> {
    guard: &'a ActionGuard,
    polling: Action,
}

impl<'a> SessionProgress<'a> {
    pub fn new(guard: &'a ActionGuard, polling: Action) -> Self {
        Self { guard, polling }
    }
}

impl TransferObserver for SessionProgress<'_> {
    fn submitted(&self, result: &TxResult) {
        self.guard
            .session()
            .update(|state| state.tx_result = Some(result.clone()));
        self.guard.phase(self.polling);
    }

    fn sender_refreshed(&self, balances: &Balances) {
        self.guard
            .session()
            .update(|state| state.sender_balances = Some(balances.clone()));
    }
}
