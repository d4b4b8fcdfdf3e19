// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-memory wallet registry.
//!
//! Wallet handles are cached by logical key for the lifetime of the process.
//! A restart is the only way to forget them. Each key has its own
//! [`OnceCell`]: concurrent first calls for the same key produce exactly one
//! provider call, and a slow creation never blocks other keys.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::info;

use crate::wallet::{WalletError, WalletHandle};

#[derive(Default)]
pub struct WalletRegistry {
    wallets: Mutex<HashMap<String, Arc<OnceCell<WalletHandle>>>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn cell(&self, key: &str) -> Arc<OnceCell<WalletHandle>> {
        self.wallets
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Cached handle for `key`, without creating one.
    pub async fn get(&self, key: &str) -> Option<WalletHandle> {
        let wallets = self.wallets.lock().await;
        wallets.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Return the cached handle or run `create` and cache its result.
    ///
    /// A failed creation leaves the key empty so the next call retries.
    pub async fn get_or_create<F, Fut>(
        &self,
        key: &str,
        create: F,
    ) -> Result<WalletHandle, WalletError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<WalletHandle, WalletError>>,
    {
        let cell = self.cell(key).await;
        let wallet = cell
            .get_or_try_init(|| async {
                let wallet = create().await?;
                info!(key, address = %wallet.address, "Cached wallet handle");
                Ok::<_, WalletError>(wallet)
            })
            .await?;
        Ok(wallet.clone())
    }

    pub async fn len(&self) -> usize {
        let wallets = self.wallets.lock().await;
        wallets.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    #[cfg(test)]
    pub async fn reset(&self) {
        self.wallets.lock().await.clear();
    }
}
