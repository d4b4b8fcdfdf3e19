// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token lookup and amount parsing.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{Balances, TokenBalance};

/// Find a token in `balances.tokens` by symbol, ignoring case.
pub fn find_token<'a>(balances: &'a Balances, symbol: &str) -> Option<&'a TokenBalance> {
    balances
        .tokens
        .iter()
        .find(|token| token.symbol.eq_ignore_ascii_case(symbol))
}

/// Numeric amount of `symbol`. A missing token counts as zero.
pub fn token_amount(balances: &Balances, symbol: &str) -> Decimal {
    let Some(token) = find_token(balances, symbol) else {
        return Decimal::ZERO;
    };

    match parse_decimal(&token.amount) {
        Some(amount) => amount,
        None => {
            warn!(
                symbol = %token.symbol,
                amount = %token.amount,
                "Unparseable token amount, treating as zero"
            );
            Decimal::ZERO
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Largest transfer accepted from a client, in whole tokens.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Most decimal places accepted from a client (ERC-20 tokens use at most 18).
pub const MAX_SCALE: u32 = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount is required")]
    Empty,
    #[error("Amount `{0}` is not a decimal number")]
    NotANumber(String),
    #[error("Amount must be greater than zero")]
    NotPositive,
    #[error("Amount must not exceed {MAX_AMOUNT}")]
    TooLarge,
    #[error("Amount has more than {MAX_SCALE} decimal places")]
    TooPrecise,
}

/// Validate a user-supplied transfer amount.
pub fn parse_amount(raw: &str) -> Result<Decimal, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let amount =
        Decimal::from_str(trimmed).map_err(|_| AmountError::NotANumber(trimmed.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(AmountError::NotPositive);
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    let amount = amount.normalize();
    if amount.scale() > MAX_SCALE {
        return Err(AmountError::TooPrecise);
    }
    Ok(amount)
}
