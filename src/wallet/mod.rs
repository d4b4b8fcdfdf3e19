// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider integration.
//!
//! Wallet creation, signing, balance queries and on-chain submission are all
//! handled by the hosted wallet service. This module provides:
//! - The [`WalletProvider`] seam used by the registry and orchestration
//! - [`WalletApiClient`], the REST implementation of that seam

pub mod client;
#[cfg(test)]
pub mod fake;
pub mod types;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::Balances;

pub use client::WalletApiClient;
pub use types::*;

/// Operations the demo needs from the hosted wallet service.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Create a wallet, or return the existing one when `linked_user` is set.
    async fn get_or_create_wallet(
        &self,
        request: &CreateWalletRequest,
    ) -> Result<WalletHandle, WalletError>;

    /// Native, usdc and the requested extra token balances.
    async fn balances(
        &self,
        wallet: &WalletHandle,
        tokens: &[String],
    ) -> Result<Balances, WalletError>;

    /// Credit test tokens from the staging faucet.
    async fn fund(
        &self,
        wallet: &WalletHandle,
        token: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError>;

    /// Transfer `amount` of `token` from `wallet` to `to`.
    async fn send(
        &self,
        wallet: &WalletHandle,
        to: &str,
        token: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError>;
}
