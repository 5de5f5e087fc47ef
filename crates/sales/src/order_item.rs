use serde::{Deserialize, Serialize};

use storefront_core::{AggregateId, DomainError, DomainResult, Money};

use crate::order::MIN_UNITS_PER_ITEM;

/// Product identifier. Product master data lives in the catalog; an order only
/// references it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One product line of an order: product, unit price, quantity.
///
/// Owned by exactly one [`Order`](crate::Order). The product reference is the
/// line's identity inside the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    /// Builds a line, rejecting quantities below the per-product minimum,
    /// negative prices and line values outside the money range.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<Self> {
        let item = Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
        };
        item.validate()?;
        Ok(item)
    }

    /// Construction rules, re-run on lines that come back from storage.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity < MIN_UNITS_PER_ITEM {
            return Err(DomainError::validation(format!(
                "minimum of {MIN_UNITS_PER_ITEM} unit per product"
            )));
        }
        if self.unit_price.is_negative() {
            return Err(DomainError::validation("unit_price must not be negative"));
        }
        self.line_value().map(|_| ())
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Unit price x quantity.
    pub fn line_value(&self) -> DomainResult<Money> {
        self.unit_price.checked_times(self.quantity).ok_or_else(|| {
            DomainError::validation(format!(
                "line value for product {} exceeds the supported range",
                self.product_id
            ))
        })
    }

    pub fn add_units(&mut self, units: u32) {
        self.quantity = self.quantity.saturating_add(units);
    }

    pub fn same_product(&self, other: &OrderItem) -> bool {
        self.product_id == other.product_id
    }
}
