// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::config::AppConfig;
use crate::recipient::RecipientService;
use crate::registry::WalletRegistry;
use crate::session::DemoSession;
use crate::transfer::TransferOrchestrator;
use crate::wallet::{CreateWalletRequest, WalletError, WalletHandle, WalletProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn WalletProvider>,
    pub registry: Arc<WalletRegistry>,
    pub recipients: Arc<RecipientService>,
    pub transfers: Arc<TransferOrchestrator>,
    pub session: Arc<DemoSession>,
    /// Fund and send tasks. They outlive the request that started them.
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn WalletProvider>) -> Self {
        let registry = Arc::new(WalletRegistry::new());
        let recipients = RecipientService::new(
            provider.clone(),
            registry.clone(),
            config.recipient_mode,
            config.chain.clone(),
            config.recipient_linked_user.clone(),
            config.tracked_tokens(),
        );
        let transfers = TransferOrchestrator::new(
            provider.clone(),
            config.token.clone(),
            config.fund_amount,
            config.poll,
        );

        Self {
            config: Arc::new(config),
            provider,
            registry,
            recipients: Arc::new(recipients),
            transfers: Arc::new(transfers),
            session: Arc::new(DemoSession::new()),
            tasks: TaskTracker::new(),
        }
    }

    /// Sender wallet for this process, created on first use.
    pub async fn sender_wallet(&self) -> Result<WalletHandle, WalletError> {
        let key = self.sender_key();
        let request =
            CreateWalletRequest::linked(&self.config.chain, &self.config.sender_linked_user);
        self.registry
            .get_or_create(&key, || {
                tracing::info!(chain = %request.chain, "Creating sender wallet");
                self.provider.get_or_create_wallet(&request)
            })
            .await
    }

    /// Sender wallet if it was already created.
    pub async fn existing_sender(&self) -> Option<WalletHandle> {
        self.registry.get(&self.sender_key()).await
    }

    fn sender_key(&self) -> String {
        format!("sender:{}", self.config.sender_linked_user)
    }
}
