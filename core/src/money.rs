// core/src/money.rs

//! Prices are stored and summed as integer cents. On the wire they are plain
//! JSON numbers with two fraction digits (`19.99`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoneyError {
  #[error("amount must be a finite number")]
  NotFinite,
  #[error("amount cannot be negative: {0}")]
  Negative(f64),
  #[error("amount is too large: {0}")]
  Overflow(f64),
}

/// A non-negative amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
  pub const ZERO: Money = Money(0);

  /// Negative inputs clamp to zero.
  pub fn from_cents(cents: i64) -> Self {
    Money(cents.max(0))
  }

  pub fn cents(self) -> i64 {
    self.0
  }

  /// Rounds to the nearest cent.
  pub fn from_decimal(amount: f64) -> Result<Self, MoneyError> {
    Self::to_cents(amount, f64::round)
  }

  /// Smallest whole-cent amount not below `amount`.
  pub fn from_decimal_ceil(amount: f64) -> Result<Self, MoneyError> {
    Self::to_cents(amount, |scaled| snap_to_cent(scaled).unwrap_or_else(|| scaled.ceil()))
  }

  /// Largest whole-cent amount not above `amount`.
  pub fn from_decimal_floor(amount: f64) -> Result<Self, MoneyError> {
    Self::to_cents(amount, |scaled| snap_to_cent(scaled).unwrap_or_else(|| scaled.floor()))
  }

  fn to_cents(amount: f64, round: impl Fn(f64) -> f64) -> Result<Self, MoneyError> {
    if !amount.is_finite() {
      return Err(MoneyError::NotFinite);
    }
    if amount < 0.0 {
      return Err(MoneyError::Negative(amount));
    }
    let cents = round(amount * 100.0);
    // 2^63 is the first value `as i64` would saturate on.
    if cents >= i64::MAX as f64 {
      return Err(MoneyError::Overflow(amount));
    }
    Ok(Money(cents as i64))
  }

  pub fn as_decimal(self) -> f64 {
    self.0 as f64 / 100.0
  }

  /// Line total for `quantity` units.
  pub fn times(self, quantity: i64) -> Money {
    Money(self.0.saturating_mul(quantity.max(0)))
  }
}

/// `39.99 * 100.0` lands a hair under 3999; treat that as the whole cent.
fn snap_to_cent(scaled: f64) -> Option<f64> {
  let nearest = scaled.round();
  ((scaled - nearest).abs() < 1e-6).then_some(nearest)
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
  }
}

impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
    Money(iter.fold(0i64, |acc, m| acc.saturating_add(m.0)))
  }
}

impl Serialize for Money {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(self.as_decimal())
  }
}

impl<'de> Deserialize<'de> for Money {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let amount = f64::deserialize(deserializer)?;
    Money::from_decimal(amount).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decimal_conversion_rounds_to_cents() {
    assert_eq!(Money::from_decimal(19.99).unwrap().cents(), 1999);
    assert_eq!(Money::from_decimal(0.1 + 0.2).unwrap().cents(), 30);
    assert_eq!(Money::from_cents(3998).as_decimal(), 39.98);
  }

  #[test]
  fn rejects_negative_and_non_finite() {
    assert_eq!(Money::from_decimal(-1.0), Err(MoneyError::Negative(-1.0)));
    assert_eq!(Money::from_decimal(f64::NAN), Err(MoneyError::NotFinite));
  }

  #[test]
  fn directed_rounding_for_range_bounds() {
    assert_eq!(Money::from_decimal_floor(49.999).unwrap().cents(), 4999);
    assert_eq!(Money::from_decimal_ceil(10.004).unwrap().cents(), 1001);
    // Already whole cents, including ones with binary noise.
    assert_eq!(Money::from_decimal_floor(39.99).unwrap().cents(), 3999);
    assert_eq!(Money::from_decimal_ceil(39.99).unwrap().cents(), 3999);
    assert_eq!(Money::from_decimal_ceil(0.1 + 0.2).unwrap().cents(), 30);
    assert_eq!(Money::from_decimal_floor(50.0).unwrap().cents(), 5000);
    assert!(Money::from_decimal_floor(-0.5).is_err());
  }

  #[test]
  fn overflow_starts_at_two_to_the_sixty_third() {
    let limit = i64::MAX as f64; // rounds up to 2^63
    assert_eq!(Money::from_decimal(limit / 100.0), Err(MoneyError::Overflow(limit / 100.0)));
    assert!(Money::from_decimal(1e16).is_ok());
  }

  #[test]
  fn line_totals_and_sums_stay_exact() {
    let price = Money::from_cents(1999);
    let total: Money = [price.times(3), Money::from_cents(1).times(7)].into_iter().sum();
    assert_eq!(total.cents(), 5997 + 7);
    assert_eq!(total.to_string(), "60.04");
  }

  #[test]
  fn serializes_as_plain_decimal() {
    let json = serde_json::to_string(&Money::from_cents(4250)).unwrap();
    assert_eq!(json, "42.5");
    let back: Money = serde_json::from_str("42.5").unwrap();
    assert_eq!(back.cents(), 4250);
    assert!(serde_json::from_str::<Money>("-3").is_err());
  }
}
