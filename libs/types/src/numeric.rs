//! Fixed-point numerics for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point
//! errors). A [`Price`] is a probability: strictly inside (0, 1). A
//! [`Quantity`] counts outcome shares and is never negative.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Construction errors for numeric newtypes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    #[error("price must be strictly between 0 and 1, got {0}")]
    PriceOutOfRange(Decimal),

    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(Decimal),

    #[error("not a decimal number: {0}")]
    Unparseable(String),
}

/// Limit price of an order, expressed as a probability
///
/// Valid prices lie strictly inside (0, 1): a YES share trading at 0.60
/// implies a 60% market-implied probability. The endpoints are excluded:
/// a certain outcome is resolution, not trading.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting values outside (0, 1)
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value <= Decimal::ZERO || value >= Decimal::ONE {
            return Err(NumericError::PriceOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Price of the opposite outcome implied by this one (1 - p)
    pub fn complement(&self) -> Price {
        // Safe: p in (0,1) implies 1-p in (0,1)
        Price(Decimal::ONE - self.0)
    }
}

impl FromStr for Price {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|_| NumericError::Unparseable(s.to_string()))?;
        Self::try_new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quantity of outcome shares
///
/// Non-negative by construction. Order placement additionally requires a
/// strictly positive quantity; zero appears only as a fill accumulator
/// starting point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity, rejecting negative values
    pub fn try_new(value: Decimal) -> Result<Self, NumericError> {
        if value < Decimal::ZERO {
            return Err(NumericError::NegativeQuantity(value));
        }
        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Subtract, returning None on underflow
    pub fn checked_sub(&self, other: Quantity) -> Option<Quantity> {
        if other.0 > self.0 {
            None
        } else {
            Some(Quantity(self.0 - other.0))
        }
    }

    pub fn min(self, other: Quantity) -> Quantity {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Collateral value of this many shares at the given price
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.as_decimal()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl FromStr for Quantity {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|_| NumericError::Unparseable(s.to_string()))?;
        Self::try_new(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_price_bounds() {
        assert!(Price::try_new(Decimal::new(6, 1)).is_ok()); // 0.6
        assert!(Price::try_new(Decimal::ZERO).is_err());
        assert!(Price::try_new(Decimal::ONE).is_err());
        assert!(Price::try_new(Decimal::new(-5, 1)).is_err());
        assert!(Price::try_new(Decimal::new(15, 1)).is_err());
    }

    #[test]
    fn test_price_complement() {
        let p = Price::from_str("0.60").unwrap();
        assert_eq!(p.complement(), Price::from_str("0.40").unwrap());
    }

    #[test]
    fn test_price_ordering() {
        let low = Price::from_str("0.55").unwrap();
        let high = Price::from_str("0.60").unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert!(Quantity::try_new(Decimal::from(-1)).is_err());
        assert!(Quantity::try_new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_quantity_default_is_zero() {
        assert_eq!(Quantity::default(), Quantity::zero());
        assert!(Quantity::default().is_zero());
    }

    #[test]
    fn test_quantity_checked_sub() {
        let a = Quantity::from_str("5").unwrap();
        let b = Quantity::from_str("3").unwrap();
        assert_eq!(a.checked_sub(b), Some(Quantity::from_str("2").unwrap()));
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn test_notional() {
        let qty = Quantity::from_str("100").unwrap();
        let price = Price::from_str("0.60").unwrap();
        assert_eq!(qty.notional(price), Decimal::from(60));
    }

    #[test]
    fn test_price_serde_round_trip() {
        let p = Price::from_str("0.55").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    proptest! {
        #[test]
        fn prop_price_complement_involution(n in 1u32..99) {
            let p = Price::try_new(Decimal::new(n as i64, 2)).unwrap();
            prop_assert_eq!(p.complement().complement(), p);
        }

        #[test]
        fn prop_quantity_sub_then_add_round_trips(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            let hi = Quantity::try_new(Decimal::from(hi)).unwrap();
            let lo = Quantity::try_new(Decimal::from(lo)).unwrap();
            let diff = hi.checked_sub(lo).unwrap();
            prop_assert_eq!(diff + lo, hi);
        }
    }
}
