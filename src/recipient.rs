// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server-held recipient wallet.
//!
//! The recipient is created once per process through the wallet provider and
//! then served from the [`WalletRegistry`]. Two lookup policies exist:
//!
//! - [`RecipientMode::Linked`]: the wallet is tied to a fixed logical user, so
//!   creation is idempotent and lookups create the wallet when missing.
//! - [`RecipientMode::Singleton`]: creation is unconditional and only happens
//!   on an explicit create call; lookups before that fail with
//!   [`RecipientError::NotCreated`].

use std::str::FromStr;
use std::sync::Arc;

use crate::models::{Balances, RecipientInfo};
use crate::registry::WalletRegistry;
use crate::wallet::{CreateWalletRequest, WalletError, WalletHandle, WalletProvider};

/// Registry key used in singleton mode.
const SINGLETON_KEY: &str = "recipient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipientMode {
    #[default]
    Linked,
    Singleton,
}

impl FromStr for RecipientMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linked" => Ok(Self::Linked),
            "singleton" => Ok(Self::Singleton),
            other => Err(format!(
                "unknown recipient mode `{other}` (expected `linked` or `singleton`)"
            )),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RecipientError {
    #[error("Recipient wallet not found. Create it first.")]
    NotCreated,

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

pub struct RecipientService {
    provider: Arc<dyn WalletProvider>,
    registry: Arc<WalletRegistry>,
    mode: RecipientMode,
    chain: String,
    linked_user: String,
    tokens: Vec<String>,
}

impl RecipientService {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        registry: Arc<WalletRegistry>,
        mode: RecipientMode,
        chain: impl Into<String>,
        linked_user: impl Into<String>,
        tokens: Vec<String>,
    ) -> Self {
        Self {
            provider,
            registry,
            mode,
            chain: chain.into(),
            linked_user: linked_user.into(),
            tokens,
        }
    }

    pub fn mode(&self) -> RecipientMode {
        self.mode
    }

    fn registry_key(&self) -> &str {
        match self.mode {
            RecipientMode::Linked => &self.linked_user,
            RecipientMode::Singleton => SINGLETON_KEY,
        }
    }

    fn create_request(&self) -> CreateWalletRequest {
        match self.mode {
            RecipientMode::Linked => CreateWalletRequest::linked(&self.chain, &self.linked_user),
            RecipientMode::Singleton => CreateWalletRequest::unlinked(&self.chain),
        }
    }

    /// Return the recipient wallet, creating it on first use.
    pub async fn get_or_create(&self) -> Result<WalletHandle, RecipientError> {
        let request = self.create_request();
        let wallet = self
            .registry
            .get_or_create(self.registry_key(), || {
                tracing::info!(chain = %request.chain, "Creating recipient wallet");
                self.provider.get_or_create_wallet(&request)
            })
            .await?;
        Ok(wallet)
    }

    /// Cached recipient wallet, if one was created in this process.
    pub async fn current(&self) -> Option<WalletHandle> {
        self.registry.get(self.registry_key()).await
    }

    /// Lookup used by read endpoints, following the configured mode.
    pub async fn lookup(&self) -> Result<WalletHandle, RecipientError> {
        match self.mode {
            RecipientMode::Linked => self.get_or_create().await,
            RecipientMode::Singleton => self.current().await.ok_or(RecipientError::NotCreated),
        }
    }

    pub async fn balances(&self, wallet: &WalletHandle) -> Result<Balances, WalletError> {
        self.provider.balances(wallet, &self.tokens).await
    }

    /// Recipient info with freshly fetched balances.
    pub async fn info(&self) -> Result<RecipientInfo, RecipientError> {
        let wallet = self.lookup().await?;
        let balances = self.balances(&wallet).await?;
        Ok(RecipientInfo {
            address: wallet.address,
            chain: wallet.chain,
            balances: Some(balances),
        })
    }
}
