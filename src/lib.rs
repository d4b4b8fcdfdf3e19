// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Transfer Demo - two-party token transfer over a hosted wallet API
//!
//! A sender wallet and a server-held recipient wallet live on a test network.
//! The service funds the sender from the staging faucet, sends tokens to the
//! recipient, and polls balances until each transfer shows up. All signing
//! and settlement is done by the wallet provider.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `balance` - Token lookup and amount parsing
//! - `config` - Environment configuration
//! - `presentation` - Walkthrough view built from session state
//! - `recipient` - Server-held recipient wallet
//! - `reconcile` - Balance polling after a submitted operation
//! - `registry` - Per-process wallet cache
//! - `session` - Demo session state and single-action exclusion
//! - `transfer` - Fund and send orchestration
//! - `wallet` - Wallet provider trait and REST client

pub mod api;
pub mod balance;
pub mod config;
pub mod error;
pub mod models;
pub mod presentation;
pub mod recipient;
pub mod reconcile;
pub mod registry;
pub mod session;
pub mod state;
pub mod transfer;
pub mod wallet;
