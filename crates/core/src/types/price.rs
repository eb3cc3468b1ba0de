//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront API prices everything in Indian rupees and serializes
//! `DecimalField`s as strings (`"100.00"`). Some totals come back as bare
//! numbers (`0` after a checkout reset), so deserialization accepts both.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in rupees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "₹";

    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from paise (hundredths of a rupee).
    #[must_use]
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price, or `None` if the
    /// amount does not fit in a `Decimal`.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Whether this price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", Self::SYMBOL, self.0.round_dp(2))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string_and_number() {
        let from_str: Price = serde_json::from_str("\"100.00\"").unwrap();
        assert_eq!(from_str, Price::from_paise(10_000));

        let from_num: Price = serde_json::from_str("0").unwrap();
        assert!(from_num.is_zero());
    }

    #[test]
    fn test_times() {
        let unit = Price::from_paise(10_000);
        assert_eq!(unit.times(5), Some(Price::from_paise(50_000)));
        assert!(unit.times(0).unwrap().is_zero());
    }

    #[test]
    fn test_times_overflow_is_none() {
        let huge: Price = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();
        assert_eq!(huge.times(1), Some(huge));
        assert_eq!(huge.times(2), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_paise(1999).to_string(), "₹19.99");
        assert_eq!(Price::from_paise(50_000).to_string(), "₹500.00");
    }

    #[test]
    fn test_checked_add() {
        let total = Price::from_paise(150).checked_add(Price::from_paise(250));
        assert_eq!(total, Some(Price::from_paise(400)));

        let huge = Price::new(Decimal::MAX);
        assert_eq!(huge.checked_add(Price::from_paise(100)), None);
    }
}
