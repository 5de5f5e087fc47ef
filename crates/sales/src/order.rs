use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use storefront_core::{
    AggregateId, AggregateRoot, CustomerId, DomainError, DomainResult, Money, ValidationResult,
};

use crate::order_item::{OrderItem, ProductId};
use crate::snapshot::OrderSnapshot;
use crate::voucher::Voucher;

/// Smallest quantity a single product line may hold.
pub const MIN_UNITS_PER_ITEM: u32 = 1;
/// Largest quantity a single product line may hold.
pub const MAX_UNITS_PER_ITEM: u32 = 15;

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle. This module only ever produces `Draft`; later
/// transitions belong to checkout and fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Started,
    Paid,
    Delivered,
    Cancelled,
}

/// Aggregate root: Order.
///
/// Owns its product lines and the applied voucher, and is the only place the
/// order total and discount are computed. Items are unique per product and the
/// total never goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    items: Vec<OrderItem>,
    subtotal: Money,
    total_value: Money,
    discount: Money,
    voucher_applied: bool,
    voucher: Option<Voucher>,
    version: u64,
}

/// Figures derived from a set of lines and the active voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Totals {
    subtotal: Money,
    discount: Money,
    total_value: Money,
}

impl Totals {
    /// Raw sum first, then the discount on that fresh sum. The discount is never
    /// derived from an already-discounted total.
    fn compute(items: &[OrderItem], voucher: Option<&Voucher>) -> DomainResult<Totals> {
        let subtotal = items.iter().try_fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.line_value()?).ok_or_else(out_of_range)
        })?;
        let discount = match voucher {
            Some(voucher) => voucher.discount_for(subtotal).ok_or_else(out_of_range)?,
            None => Money::ZERO,
        };

        Ok(Totals {
            subtotal,
            discount,
            total_value: subtotal.saturating_sub(discount),
        })
    }
}

fn out_of_range() -> DomainError {
    DomainError::invariant("order value exceeds the supported range")
}

/// Start a new, empty draft order for `customer_id`.
pub fn new_draft_order(customer_id: CustomerId) -> Order {
    new_draft_order_with_id(OrderId::new(AggregateId::new()), customer_id)
}

/// Like [`new_draft_order`], with a caller-allocated identifier.
pub fn new_draft_order_with_id(id: OrderId, customer_id: CustomerId) -> Order {
    let mut order = Order {
        id,
        customer_id,
        status: OrderStatus::Draft,
        items: Vec::new(),
        subtotal: Money::ZERO,
        total_value: Money::ZERO,
        discount: Money::ZERO,
        voucher_applied: false,
        voucher: None,
        version: 0,
    };
    order.make_draft();

    debug!(order_id = %order.id, customer_id = %customer_id, "draft order created");
    order
}

impl Order {
    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Read-only view of the product lines, oldest change first.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.product_id() == product_id)
    }

    /// Sum of line values before any discount.
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Amount due: subtotal minus discount, never below zero.
    pub fn total_value(&self) -> Money {
        self.total_value
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn voucher_applied(&self) -> bool {
        self.voucher_applied
    }

    pub fn voucher(&self) -> Option<&Voucher> {
        self.voucher.as_ref()
    }

    /// True if a line for the candidate's product already exists.
    pub fn has_item(&self, item: &OrderItem) -> bool {
        self.position_of(item.product_id()).is_some()
    }

    /// Add a line, merging into the existing line for the same product.
    ///
    /// The quantity limit is checked against the merged quantity. A merged line
    /// keeps its original name and unit price and moves to the end of the list.
    pub fn add_item(&mut self, item: OrderItem) -> DomainResult<()> {
        let existing = self.position_of(item.product_id());
        let already_ordered = existing.map_or(0, |idx| self.items[idx].quantity());
        self.ensure_quantity_allowed(
            item.product_id(),
            already_ordered.saturating_add(item.quantity()),
        )?;

        let product_id = item.product_id();
        let mut items = self.items.clone();
        match existing {
            Some(idx) => {
                let mut merged = items.remove(idx);
                merged.add_units(item.quantity());
                items.push(merged);
            }
            None => items.push(item),
        }

        let totals = self.price(&items)?;
        self.commit(items, totals);

        debug!(
            order_id = %self.id,
            product_id = %product_id,
            merged = existing.is_some(),
            total_value = %self.total_value,
            "order item added"
        );
        Ok(())
    }

    /// Overwrite the line for the item's product.
    ///
    /// Unlike [`add_item`](Self::add_item), the limit is checked against the
    /// incoming quantity alone: the existing line is replaced, not topped up.
    pub fn update_item(&mut self, item: OrderItem) -> DomainResult<()> {
        let idx = self.existing_position(item.product_id())?;
        self.ensure_quantity_allowed(item.product_id(), item.quantity())?;

        let product_id = item.product_id();
        let quantity = item.quantity();
        let mut items = self.items.clone();
        items.remove(idx);
        items.push(item);

        let totals = self.price(&items)?;
        self.commit(items, totals);

        debug!(
            order_id = %self.id,
            product_id = %product_id,
            quantity,
            total_value = %self.total_value,
            "order item updated"
        );
        Ok(())
    }

    /// Remove the line for the item's product.
    pub fn remove_item(&mut self, item: &OrderItem) -> DomainResult<()> {
        let idx = self.existing_position(item.product_id())?;
        let mut items = self.items.clone();
        items.remove(idx);

        let totals = self.price(&items)?;
        self.commit(items, totals);

        debug!(
            order_id = %self.id,
            product_id = %item.product_id(),
            total_value = %self.total_value,
            "order item removed"
        );
        Ok(())
    }

    /// Apply `voucher` if it is currently applicable.
    pub fn apply_voucher(&mut self, voucher: Voucher) -> ValidationResult {
        self.apply_voucher_at(voucher, Utc::now())
    }

    /// Apply `voucher` if it is applicable at `now`.
    ///
    /// On failure the order is untouched and the failures are returned. On
    /// success the voucher replaces any previously applied one, and its
    /// discount is taken from the raw item sum, never from a total an earlier
    /// voucher already reduced.
    pub fn apply_voucher_at(&mut self, voucher: Voucher, now: DateTime<Utc>) -> ValidationResult {
        let mut result = voucher.validate_applicable_at(now);
        let totals = if result.is_valid() {
            match Totals::compute(&self.items, Some(&voucher)) {
                Ok(totals) => Some(totals),
                Err(_) => {
                    result.push("discount", "discount cannot be computed for this order");
                    None
                }
            }
        } else {
            None
        };

        let Some(totals) = totals else {
            warn!(
                order_id = %self.id,
                voucher_code = %voucher.code,
                failures = result.failures().len(),
                "voucher rejected"
            );
            return result;
        };

        let code = voucher.code.clone();
        self.voucher = Some(voucher);
        self.voucher_applied = true;
        let items = core::mem::take(&mut self.items);
        self.commit(items, totals);

        debug!(
            order_id = %self.id,
            voucher_code = %code,
            discount = %self.discount,
            total_value = %self.total_value,
            "voucher applied"
        );
        result
    }

    /// Capture every field for persistence.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id,
            customer_id: self.customer_id,
            status: self.status,
            items: self.items.clone(),
            total_value: self.total_value,
            discount: self.discount,
            voucher_applied: self.voucher_applied,
            voucher: self.voucher.clone(),
            version: self.version,
        }
    }

    /// Rebuild an order from a snapshot.
    ///
    /// Snapshots breaking the order invariants are rejected: each line must
    /// pass the construction rules of [`OrderItem::new`] and the stored voucher
    /// must carry a positive discount. Total and discount are recomputed from
    /// the lines and voucher; stored figures are not trusted.
    pub fn restore(snapshot: OrderSnapshot) -> DomainResult<Order> {
        for (idx, item) in snapshot.items.iter().enumerate() {
            if snapshot.items[..idx].iter().any(|other| other.same_product(item)) {
                return Err(DomainError::invariant(format!(
                    "duplicate line for product {} in order snapshot",
                    item.product_id()
                )));
            }
            if !(MIN_UNITS_PER_ITEM..=MAX_UNITS_PER_ITEM).contains(&item.quantity()) {
                return Err(DomainError::invariant(format!(
                    "quantity {} for product {} outside {MIN_UNITS_PER_ITEM}..={MAX_UNITS_PER_ITEM}",
                    item.quantity(),
                    item.product_id()
                )));
            }
            item.validate().map_err(|err| {
                DomainError::invariant(format!("order snapshot line rejected: {err}"))
            })?;
        }

        match (&snapshot.voucher, snapshot.voucher_applied) {
            (None, true) => {
                return Err(DomainError::invariant(
                    "voucher marked as applied but no voucher stored",
                ));
            }
            (Some(_), false) => {
                return Err(DomainError::invariant(
                    "voucher stored but not marked as applied",
                ));
            }
            (Some(voucher), true) => {
                let check = voucher.validate_discount();
                if !check.is_valid() {
                    return Err(DomainError::invariant(format!(
                        "stored voucher rejected: {}",
                        check.messages().collect::<Vec<_>>().join(", ")
                    )));
                }
            }
            (None, false) => {}
        }
        if !snapshot.voucher_applied && !snapshot.discount.is_zero() {
            return Err(DomainError::invariant(
                "discount recorded without an applied voucher",
            ));
        }

        let totals = Totals::compute(&snapshot.items, snapshot.voucher.as_ref())?;
        if totals.total_value != snapshot.total_value || totals.discount != snapshot.discount {
            warn!(
                order_id = %snapshot.id,
                stored_total = %snapshot.total_value,
                total_value = %totals.total_value,
                "stored order totals were stale; recomputed"
            );
        }

        Ok(Order {
            id: snapshot.id,
            customer_id: snapshot.customer_id,
            status: snapshot.status,
            items: snapshot.items,
            subtotal: totals.subtotal,
            total_value: totals.total_value,
            discount: totals.discount,
            voucher_applied: snapshot.voucher_applied,
            voucher: snapshot.voucher,
            version: snapshot.version,
        })
    }
}

impl Order {
    fn make_draft(&mut self) {
        self.status = OrderStatus::Draft;
    }

    fn position_of(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id() == product_id)
    }

    fn existing_position(&self, product_id: ProductId) -> DomainResult<usize> {
        self.position_of(product_id).ok_or_else(|| {
            warn!(order_id = %self.id, product_id = %product_id, "item not in order");
            DomainError::invariant("item does not belong to the order")
        })
    }

    fn ensure_quantity_allowed(&self, product_id: ProductId, projected: u32) -> DomainResult<()> {
        if projected > MAX_UNITS_PER_ITEM {
            warn!(
                order_id = %self.id,
                product_id = %product_id,
                projected,
                "quantity limit exceeded"
            );
            return Err(DomainError::invariant(format!(
                "maximum of {MAX_UNITS_PER_ITEM} units per product"
            )));
        }
        Ok(())
    }

    fn active_voucher(&self) -> Option<&Voucher> {
        self.voucher.as_ref().filter(|_| self.voucher_applied)
    }

    /// Totals for candidate lines under the active voucher.
    fn price(&self, items: &[OrderItem]) -> DomainResult<Totals> {
        Totals::compute(items, self.active_voucher()).inspect_err(|err| {
            warn!(order_id = %self.id, error = %err, "order value out of range");
        })
    }

    /// Install lines and their totals together; the only place accepted
    /// changes land.
    fn commit(&mut self, items: Vec<OrderItem>, totals: Totals) {
        self.items = items;
        self.subtotal = totals.subtotal;
        self.discount = totals.discount;
        self.total_value = totals.total_value;
        self.version += 1;
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
