//! Discount vouchers.
//!
//! Voucher issuance happens elsewhere; this module only models what an order
//! needs to know: the discount parameters and whether the voucher may be used
//! right now.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{AggregateId, Money, ValidationResult};

/// Voucher identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoucherId(pub AggregateId);

impl VoucherId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for VoucherId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How a voucher reduces the order value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherDiscountKind {
    FixedAmount,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: VoucherId,
    pub code: String,
    pub discount_kind: VoucherDiscountKind,
    pub fixed_amount: Option<Money>,
    /// Percent points, e.g. `10` for 10%.
    pub percentage: Option<Decimal>,
    /// Remaining redemptions.
    pub quantity: u32,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
    pub used: bool,
}

impl Voucher {
    /// An active, unused voucher taking `amount` off the order.
    pub fn fixed_amount(
        code: impl Into<String>,
        amount: Money,
        quantity: u32,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VoucherId::new(AggregateId::new()),
            code: code.into(),
            discount_kind: VoucherDiscountKind::FixedAmount,
            fixed_amount: Some(amount),
            percentage: None,
            quantity,
            expires_at,
            active: true,
            used: false,
        }
    }

    /// An active, unused voucher taking `percent`% off the order.
    pub fn percentage(
        code: impl Into<String>,
        percent: Decimal,
        quantity: u32,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VoucherId::new(AggregateId::new()),
            code: code.into(),
            discount_kind: VoucherDiscountKind::Percentage,
            fixed_amount: None,
            percentage: Some(percent),
            quantity,
            expires_at,
            active: true,
            used: false,
        }
    }

    /// Discount this voucher grants on `value`. Unset parameters grant nothing;
    /// `None` means the discount falls outside the money range.
    pub fn discount_for(&self, value: Money) -> Option<Money> {
        match self.discount_kind {
            VoucherDiscountKind::FixedAmount => Some(self.fixed_amount.unwrap_or(Money::ZERO)),
            VoucherDiscountKind::Percentage => match self.percentage {
                Some(p) => value.checked_percent(p),
                None => Some(Money::ZERO),
            },
        }
    }

    pub fn validate_applicable(&self) -> ValidationResult {
        self.validate_applicable_at(Utc::now())
    }

    /// Checks every applicability rule and reports all failures at once.
    pub fn validate_applicable_at(&self, now: DateTime<Utc>) -> ValidationResult {
        let mut result = ValidationResult::valid();

        result.ensure(self.expires_at >= now, "expires_at", "voucher has expired");
        result.ensure(!self.code.trim().is_empty(), "code", "voucher has no valid code");
        result.ensure(self.active, "active", "voucher is no longer valid");
        result.ensure(!self.used, "used", "voucher has already been used");
        result.ensure(self.quantity > 0, "quantity", "voucher is no longer available");
        self.check_discount(&mut result);

        result
    }

    /// Only the discount parameters: the value for the voucher's kind must be
    /// set and positive. Holds for any voucher an order has accepted.
    pub fn validate_discount(&self) -> ValidationResult {
        let mut result = ValidationResult::valid();
        self.check_discount(&mut result);
        result
    }

    fn check_discount(&self, result: &mut ValidationResult) {
        match self.discount_kind {
            VoucherDiscountKind::FixedAmount => result.ensure(
                self.fixed_amount.is_some_and(|a| a > Money::ZERO),
                "fixed_amount",
                "discount amount must be greater than 0",
            ),
            VoucherDiscountKind::Percentage => result.ensure(
                self.percentage.is_some_and(|p| p > Decimal::ZERO),
                "percentage",
                "discount percentage must be greater than 0",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_vouchers_are_applicable() {
        let expires = test_time() + Duration::days(7);
        assert!(Voucher::fixed_amount("PROMO-15", Money::from(15), 1, expires)
            .validate_applicable_at(test_time())
            .is_valid());
        assert!(Voucher::percentage("PROMO-10", dec!(10), 1, expires)
            .validate_applicable_at(test_time())
            .is_valid());
    }

    #[test]
    fn validate_applicable_uses_the_current_clock() {
        let voucher = Voucher::percentage("PROMO-10", dec!(10), 1, test_time());
        assert!(!voucher.validate_applicable().is_valid());

        let voucher = Voucher::percentage("PROMO-10", dec!(10), 1, Utc::now() + Duration::days(1));
        assert!(voucher.validate_applicable().is_valid());
    }

    #[test]
    fn reports_every_broken_rule() {
        let at = test_time();
        let voucher = Voucher {
            id: VoucherId::new(AggregateId::new()),
            code: "  ".to_string(),
            discount_kind: VoucherDiscountKind::Percentage,
            fixed_amount: None,
            percentage: None,
            quantity: 0,
            expires_at: at - Duration::days(1),
            active: false,
            used: true,
        };

        let result = voucher.validate_applicable_at(at);
        let fields: Vec<_> = result.failures().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["expires_at", "code", "active", "used", "quantity", "percentage"]
        );
    }

    #[test]
    fn fixed_amount_voucher_needs_a_positive_amount() {
        let voucher = Voucher::fixed_amount("ZERO", Money::ZERO, 1, test_time() + Duration::days(1));
        let result = voucher.validate_applicable_at(test_time());
        assert_eq!(
            result.messages().collect::<Vec<_>>(),
            vec!["discount amount must be greater than 0"]
        );
    }

    #[test]
    fn expiry_is_inclusive() {
        let at = test_time();
        let voucher = Voucher::percentage("EDGE", dec!(5), 1, at);
        assert!(voucher.validate_applicable_at(at).is_valid());
    }

    #[test]
    fn discount_for_follows_the_kind() {
        let expires = test_time();
        let fixed = Voucher::fixed_amount("F", Money::from(30), 1, expires);
        let pct = Voucher::percentage("P", dec!(10), 1, expires);
        assert_eq!(fixed.discount_for(Money::from(500)), Some(Money::from(30)));
        assert_eq!(pct.discount_for(Money::from(500)), Some(Money::from(50)));

        let mut unset = pct.clone();
        unset.percentage = None;
        assert_eq!(unset.discount_for(Money::from(500)), Some(Money::ZERO));

        let huge = Voucher::percentage("HUGE", dec!(1000), 1, expires);
        assert_eq!(huge.discount_for(Money::new(Decimal::MAX)), None);
    }

    #[test]
    fn validate_discount_ignores_redemption_state() {
        let mut voucher = Voucher::fixed_amount("OLD", Money::from(5), 0, test_time() - Duration::days(1));
        voucher.used = true;
        assert!(voucher.validate_discount().is_valid());

        voucher.fixed_amount = Some(Money::from(-50));
        let result = voucher.validate_discount();
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].field, "fixed_amount");
    }
}
