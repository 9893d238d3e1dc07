//! Wallet aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CooperativeId, MemberId, Timestamp, ValidationError, WalletId};

use super::FinanceError;

/// Default wallet currency.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// Decimal places tracked on wallet balances.
const BALANCE_PRECISION: u32 = 2;

/// A member's internal wallet within a cooperative.
///
/// Balances are stored as canonical decimal strings and adjusted with
/// integer minor-unit arithmetic; floats never touch money.
///
/// # Invariants
///
/// - At most one wallet per member per cooperative
/// - Balance changes only through [`Wallet::credit`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub member_id: MemberId,
    pub cooperative_id: CooperativeId,

    /// Canonical decimal string, e.g. `"0.00"`.
    pub balance: String,

    /// ISO 4217 currency code.
    pub currency_code: String,

    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Wallet {
    /// Opens a fresh zero-balance wallet for a member.
    pub fn open(member_id: MemberId, cooperative_id: CooperativeId) -> Self {
        let now = Timestamp::now();
        Self {
            id: WalletId::new(),
            member_id,
            cooperative_id,
            balance: format_minor_units(0),
            currency_code: DEFAULT_CURRENCY.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Credits a deposit amount, given as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns `FinanceError::ValidationFailed` if the amount is not a
    /// non-negative decimal with at most two fractional digits, or if
    /// the stored balance fails to parse.
    pub fn credit(&mut self, amount: &str) -> Result<(), FinanceError> {
        let amount_units = parse_minor_units(amount)
            .map_err(|e| FinanceError::validation("amount", e.to_string()))?;
        let balance_units = parse_minor_units(&self.balance)
            .map_err(|e| FinanceError::validation("balance", e.to_string()))?;

        self.balance = format_minor_units(balance_units + amount_units);
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Parses a non-negative decimal string into minor units (kobo).
fn parse_minor_units(value: &str) -> Result<i128, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::empty_field("amount"));
    }

    let (whole, frac) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(ValidationError::invalid_format("amount", "no digits"));
    }
    if frac.len() > BALANCE_PRECISION as usize {
        return Err(ValidationError::invalid_format(
            "amount",
            "more than two decimal places",
        ));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::invalid_format(
            "amount",
            "must be a non-negative decimal",
        ));
    }

    let whole_units: i128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| ValidationError::invalid_format("amount", "whole part out of range"))?
    };

    let mut frac_units: i128 = 0;
    if !frac.is_empty() {
        frac_units = frac
            .parse()
            .map_err(|_| ValidationError::invalid_format("amount", "fraction out of range"))?;
        for _ in frac.len()..BALANCE_PRECISION as usize {
            frac_units *= 10;
        }
    }

    Ok(whole_units * 100 + frac_units)
}

/// Formats minor units back into a canonical two-decimal string.
fn format_minor_units(units: i128) -> String {
    format!("{}.{:02}", units / 100, units % 100)
}
