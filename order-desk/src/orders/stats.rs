//! Dashboard and payments aggregates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderStatus};

/// Number of orders on the dashboard's "recent" panel
pub const RECENT_LIMIT: usize = 5;

/// Headline numbers of the dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderOverview {
    /// Sum of `total_amount` over every order, cancelled ones included
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
}

pub fn overview<T: AsRef<Order>>(orders: &[T]) -> OrderOverview {
    orders
        .iter()
        .map(AsRef::as_ref)
        .fold(OrderOverview::default(), |mut acc, order| {
            acc.total_revenue += order.total_amount;
            acc.total_orders += 1;
            match order.status {
                OrderStatus::Pending => acc.pending_orders += 1,
                OrderStatus::Delivered => acc.delivered_orders += 1,
                _ => {}
            }
            acc
        })
}

/// The first [`RECENT_LIMIT`] orders of a newest-first list
pub fn recent<T>(orders: &[T]) -> &[T] {
    &orders[..orders.len().min(RECENT_LIMIT)]
}

/// Revenue counted on the payments view: everything except cancelled orders
pub fn settled_revenue<T: AsRef<Order>>(orders: &[T]) -> Decimal {
    orders
        .iter()
        .map(AsRef::as_ref)
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total_amount)
        .sum()
}

/// Payment column of the payments view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Cancelled,
    /// Delivered and paid
    Settled,
    Awaiting,
}

impl PaymentState {
    pub fn of(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Cancelled => PaymentState::Cancelled,
            OrderStatus::Delivered => PaymentState::Settled,
            _ => PaymentState::Awaiting,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentState::Cancelled => "Cancelled",
            PaymentState::Settled => "Paid",
            PaymentState::Awaiting => "Pending",
        }
    }
}
