//! Monetary amount backed by `rust_decimal`.
//!
//! Amounts keep the full precision they were parsed with; the running
//! balance is exact and reproducible, never subject to float drift.
//! Rounding to 2 places happens only when an amount is displayed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Largest magnitude accepted from a source cell or configuration.
///
/// Keeps any realistic number of rows summing well inside `Decimal`'s range.
const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000_000;

/// A monetary amount at full parsed precision.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use ledger_engine::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
///
/// // Lenient parsing never fails: garbage becomes zero.
/// assert!(Amount::coerce("n/a").is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places used when displaying.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Parses a raw cell, coercing anything unparseable to zero.
    ///
    /// Accepts plain decimals (`"1500"`, `" -2.75 "`) and scientific
    /// notation (`"1e3"`). Blank cells, text, symbols such as `"₹100"` and
    /// magnitudes beyond 10^18 all yield [`Amount::ZERO`].
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::ZERO;
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok()
            .filter(within_limit)
            .map(Amount)
            .unwrap_or(Self::ZERO)
    }

    /// Like [`Amount::coerce`] but for an optional cell.
    pub fn coerce_opt(raw: Option<&str>) -> Self {
        raw.map(Self::coerce).unwrap_or(Self::ZERO)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Value rounded half away from zero to [`Amount::DISPLAY_SCALE`] places.
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Lossy conversion for spreadsheet number cells.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }
}

fn within_limit(value: &Decimal) -> bool {
    value.abs() <= Decimal::from(AMOUNT_LIMIT)
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    /// Strict parse, for configured values such as the opening balance.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        if !within_limit(&decimal) {
            return Err(rust_decimal::Error::ExceedsMaximumPossibleValue);
        }
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

// Arithmetic saturates at the `Decimal` bounds instead of panicking.

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}
