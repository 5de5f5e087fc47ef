//! Monetary amounts.
//!
//! Amounts are exact decimals so percentage discounts never drift the way
//! floating point would. Currency is implicit: a single order is always priced
//! in one currency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A monetary amount.
///
/// Arithmetic is checked: anything that would leave the `Decimal` range
/// returns `None` instead of panicking.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Amount multiplied by a unit count (line value = unit price x quantity).
    pub fn checked_times(&self, units: u32) -> Option<Money> {
        self.0.checked_mul(Decimal::from(units)).map(Money)
    }

    /// `percent`% of this amount, unrounded.
    pub fn checked_percent(&self, percent: Decimal) -> Option<Money> {
        self.0
            .checked_mul(percent)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(Money)
    }

    /// Sum of `amounts`, or `None` on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Subtraction clamped at zero.
    pub fn saturating_sub(&self, other: Money) -> Money {
        match self.0.checked_sub(other.0) {
            Some(value) if !value.is_sign_negative() => Money(value),
            _ => Money::ZERO,
        }
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u32> for Money {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<i32> for Money {
    fn from(value: i32) -> Self {
        Self(Decimal::from(value))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn times_multiplies_by_units() {
        assert_eq!(Money::new(dec!(12.50)).checked_times(4), Some(Money::new(dec!(50))));
        assert_eq!(Money::new(dec!(12.50)).checked_times(0), Some(Money::ZERO));
    }

    #[test]
    fn percent_is_exact() {
        assert_eq!(
            Money::new(dec!(500)).checked_percent(dec!(10)),
            Some(Money::new(dec!(50)))
        );
        assert_eq!(
            Money::new(dec!(33)).checked_percent(dec!(12.5)),
            Some(Money::new(dec!(4.125)))
        );
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_times(2), None);
        assert_eq!(max.checked_add(Money::from(1)), None);
        assert_eq!(max.checked_percent(dec!(200)), None);
        assert_eq!(Money::checked_sum([max, max]), None);
        assert_eq!(max.checked_times(1), Some(max));
    }

    #[test]
    fn saturating_sub_clamps_at_zero() {
        assert_eq!(Money::from(100).saturating_sub(Money::from(30)), Money::from(70));
        assert_eq!(Money::from(100).saturating_sub(Money::from(300)), Money::ZERO);
        assert!(!Money::from(100).saturating_sub(Money::from(300)).is_negative());
    }

    #[test]
    fn sums_line_values() {
        let total = Money::checked_sum([Money::from(1), Money::new(dec!(2.25)), Money::from(3)]);
        assert_eq!(total, Some(Money::new(dec!(6.25))));
        assert_eq!(Money::checked_sum(core::iter::empty()), Some(Money::ZERO));
    }

    #[test]
    fn serializes_as_bare_decimal() {
        let json = serde_json::to_string(&Money::new(dec!(19.90))).unwrap();
        assert_eq!(json, "\"19.90\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::new(dec!(19.90)));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: subtracting any amount never yields a negative result.
        #[test]
        fn saturating_sub_is_never_negative(a in 0i64..1_000_000, b in 0i64..1_000_000) {
            let result = Money::new(Decimal::new(a, 2)).saturating_sub(Money::new(Decimal::new(b, 2)));
            prop_assert!(!result.is_negative());
            if a >= b {
                prop_assert_eq!(result, Money::new(Decimal::new(a - b, 2)));
            } else {
                prop_assert_eq!(result, Money::ZERO);
            }
        }
    }
}
