//! Order filter engine
//!
//! Applies an [`OrderViewState`] to a fetched, newest-first batch. The engine
//! never re-sorts and never mutates its input: it hands back references to
//! the orders that pass both the status and the date predicate.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use shared::models::Order;
use shared::view::OrderViewState;

use super::summary::summarize_items;
use super::window::DateWindow;

/// A filtered order together with its one-line item summary
#[derive(Debug, Clone, Serialize)]
pub struct OrderListing<'a, T> {
    #[serde(flatten)]
    pub entry: &'a T,
    pub items_summary: String,
}

#[derive(Clone)]
pub struct OrderFilterEngine<Tz: TimeZone> {
    view: OrderViewState,
    window: DateWindow<Tz>,
}

impl<Tz: TimeZone> OrderFilterEngine<Tz> {
    /// Engine for `view`, with calendar questions answered in `now`'s zone
    pub fn new(view: OrderViewState, now: DateTime<Tz>) -> Self {
        let window = DateWindow::resolve(view.date, view.custom_date, &now);
        Self { view, window }
    }

    pub fn view(&self) -> &OrderViewState {
        &self.view
    }

    pub fn window(&self) -> &DateWindow<Tz> {
        &self.window
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.view.status.matches(order.status) && self.window.contains(&order.created_at)
    }

    /// Orders passing both predicates, in input order
    pub fn filter<'a, T: AsRef<Order>>(&self, orders: &'a [T]) -> Vec<&'a T> {
        orders.iter().filter(|o| self.matches((*o).as_ref())).collect()
    }

    /// [`OrderFilterEngine::filter`] plus an item summary per order
    pub fn listing<'a, T: AsRef<Order>>(&self, orders: &'a [T]) -> Vec<OrderListing<'a, T>> {
        self.filter(orders)
            .into_iter()
            .map(|entry| OrderListing {
                entry,
                items_summary: summarize_items(&entry.as_ref().items),
            })
            .collect()
    }
}

impl OrderFilterEngine<Local> {
    /// Engine using the host's zone and clock
    pub fn local(view: OrderViewState) -> Self {
        Self::new(view, Local::now())
    }
}
