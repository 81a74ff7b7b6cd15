//! Money value object in integer minor units (cents).
//!
//! Currency amounts never touch binary floating point. Every value, input
//! or derived, lies within [`Money::MAX_ABS_CENTS`]. Inputs beyond it are
//! rejected; derived totals beyond it saturate at the bound.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use super::ValidationError;

/// A signed amount of money in cents.
///
/// Positive values are debits (increase a price), negative values are
/// credits (decrease it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Largest magnitude accepted for a single amount: one trillion dollars.
    pub const MAX_ABS_CENTS: i64 = 100_000_000_000_000;

    /// Creates an amount from cents, rejecting magnitudes above the bound.
    pub fn try_from_cents(cents: i64) -> Result<Self, ValidationError> {
        Self::bounded("amount", cents)
    }

    /// Creates an amount from whole dollars.
    pub fn try_from_dollars(dollars: i64) -> Result<Self, ValidationError> {
        let cents = dollars.checked_mul(100).ok_or_else(|| {
            ValidationError::out_of_range(
                "amount",
                -Self::MAX_ABS_CENTS,
                Self::MAX_ABS_CENTS,
                dollars,
            )
        })?;
        Self::bounded("amount", cents)
    }

    /// Validates `cents` for a named field.
    pub fn for_field(field: &str, cents: i64) -> Result<Self, ValidationError> {
        Self::bounded(field, cents)
    }

    fn bounded(field: &str, cents: i64) -> Result<Self, ValidationError> {
        if cents.checked_abs().map_or(true, |abs| abs > Self::MAX_ABS_CENTS) {
            return Err(ValidationError::out_of_range(
                field,
                -Self::MAX_ABS_CENTS,
                Self::MAX_ABS_CENTS,
                cents,
            ));
        }
        Ok(Self(cents))
    }

    /// Clamps an exact total into the bound.
    pub fn saturating_from_total(cents: i128) -> Self {
        let max = i128::from(Self::MAX_ABS_CENTS);
        // Clamped into ±MAX_ABS_CENTS, which fits i64.
        Self(cents.clamp(-max, max) as i64)
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// True for amounts that reduce a price.
    pub fn is_credit(&self) -> bool {
        self.0 < 0
    }

    /// True for amounts that increase a price.
    pub fn is_debit(&self) -> bool {
        self.0 > 0
    }
}

impl TryFrom<i64> for Money {
    type Error = ValidationError;

    fn try_from(cents: i64) -> Result<Self, Self::Error> {
        Self::try_from_cents(cents)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Saturates at the bound.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::saturating_from_total(i128::from(self.0) + i128::from(rhs.0))
    }
}

/// Sums exactly and clamps once, so the result does not depend on order.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money::saturating_from_total(iter.map(|m| i128::from(m.0)).sum())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
