//! Sales domain module: the shopping order aggregate.
//!
//! Business rules for orders (item limits, voucher discounts, totals),
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod order;
pub mod order_item;
pub mod snapshot;
pub mod voucher;

pub use order::{
    new_draft_order, new_draft_order_with_id, Order, OrderId, OrderStatus, MAX_UNITS_PER_ITEM,
    MIN_UNITS_PER_ITEM,
};
pub use order_item::{OrderItem, ProductId};
pub use snapshot::OrderSnapshot;
pub use voucher::{Voucher, VoucherDiscountKind, VoucherId};
