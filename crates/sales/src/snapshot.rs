//! Persistence boundary for orders.
//!
//! Repositories store an [`OrderSnapshot`] and hand it back to
//! [`Order::restore`](crate::Order::restore), which re-checks the order
//! invariants before an aggregate exists again.

use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, Money};

use crate::order::{OrderId, OrderStatus};
use crate::order_item::OrderItem;
use crate::voucher::Voucher;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_value: Money,
    pub discount: Money,
    pub voucher_applied: bool,
    pub voucher: Option<Voucher>,
    pub version: u64,
}
