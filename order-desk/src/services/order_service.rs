//! Order Service
//!
//! Fetch, enrich and mutate orders. The list pipeline degrades instead of
//! failing: an unavailable `orders` table yields an empty batch and an
//! unavailable `profiles` table yields orders without customers, each with a
//! notice the caller can surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{Order, OrderItemRecord, OrderStatus, OrderUpdateStatus, Profile};
use std::sync::Arc;
use tracing::instrument;

use crate::orders::stats::{self, OrderOverview, PaymentState};
use crate::orders::{DashboardOrder, distinct_owner_refs, join_profiles};
use crate::store::{DataStore, DataStoreExt, Filter, Query, RejectedRow};
use crate::utils::{AppError, AppResult, ErrorCode};

const ORDERS: &str = "orders";
const PROFILES: &str = "profiles";
const ORDER_ITEMS: &str = "order_items";

/// Result of one list fetch
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    /// Newest first
    pub orders: Vec<DashboardOrder>,
    /// Non-fatal failures hit while assembling the batch
    pub notices: Vec<AppError>,
}

/// Single order with its persisted lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItemRecord>,
}

/// Payments view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsSummary {
    /// Sum over orders that are not cancelled
    pub total_revenue: rust_decimal::Decimal,
    pub transactions: Vec<PaymentRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRow {
    pub order_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub status: OrderStatus,
    pub payment: PaymentState,
    pub amount: rust_decimal::Decimal,
}

/// Dashboard landing numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    #[serde(flatten)]
    pub stats: OrderOverview,
    pub recent_orders: Vec<Order>,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn DataStore>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// All readable orders, newest first
    ///
    /// Rows that do not decode are skipped and logged.
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        Ok(self.fetch_orders().await?.0)
    }

    /// Readable orders plus one notice per row that was skipped
    async fn fetch_orders(&self) -> AppResult<(Vec<Order>, Vec<AppError>)> {
        let decoded = self
            .store
            .fetch_each::<Order>(ORDERS, &Query::newest_first())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error fetching orders");
                AppError::from(e)
            })?;
        let notices = decoded.rejected.into_iter().map(rejected_order).collect();
        Ok((decoded.rows, notices))
    }

    /// Profiles for the given owner references (no request for an empty set)
    pub async fn fetch_profiles(&self, owner_refs: &[&str]) -> AppResult<Vec<Profile>> {
        if owner_refs.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::new()
            .columns(Profile::COLUMNS)
            .is_in("id", owner_refs.iter().copied());
        Ok(self.store.fetch::<Profile>(PROFILES, &query).await?)
    }

    /// Orders joined with their customers' profiles
    ///
    /// Never fails; see the module docs.
    #[instrument(skip(self))]
    pub async fn load_order_batch(&self) -> OrderBatch {
        let (orders, mut notices) = match self.fetch_orders().await {
            Ok(fetched) => fetched,
            Err(e) => {
                return OrderBatch {
                    orders: Vec::new(),
                    notices: vec![e],
                };
            }
        };

        let owner_refs = distinct_owner_refs(&orders);
        let profiles = match self.fetch_profiles(&owner_refs).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching profiles");
                notices.push(e);
                Vec::new()
            }
        };

        tracing::debug!(
            orders = orders.len(),
            profiles = profiles.len(),
            "Order batch loaded"
        );
        OrderBatch {
            orders: join_profiles(orders, profiles),
            notices,
        }
    }

    /// Persist a new status
    ///
    /// Nothing local is changed; callers re-fetch after success.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: i64, status: OrderStatus) -> AppResult<()> {
        let updated = self
            .store
            .update_where(
                ORDERS,
                &OrderUpdateStatus { status },
                &[Filter::eq("id", order_id)],
            )
            .await
            .map_err(|e| {
                tracing::error!(order_id, error = %e, "Error updating status");
                AppError::new(ErrorCode::OrderStatusUpdateFailed).with_detail("reason", e.to_string())
            })?;

        if updated.is_empty() {
            return Err(AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id));
        }
        tracing::info!(order_id, status = %status, "Order status updated");
        Ok(())
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<Order> {
        self.store
            .fetch_one::<Order>(ORDERS, &Query::new().eq("id", order_id))
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id))
    }

    /// Order plus its `order_items` rows joined with `foods`
    ///
    /// A failed item lookup leaves the item list empty.
    #[instrument(skip(self))]
    pub async fn order_detail(&self, order_id: i64) -> AppResult<OrderDetail> {
        let order = self.get_order(order_id).await?;

        let query = Query::new().columns("*, foods(*)").eq("order_id", order_id);
        let items = match self.store.fetch::<OrderItemRecord>(ORDER_ITEMS, &query).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(order_id, error = %e, "Error fetching order items");
                Vec::new()
            }
        };

        Ok(OrderDetail { order, items })
    }

    pub async fn dashboard_overview(&self) -> AppResult<DashboardOverview> {
        let orders = self.list_orders().await?;
        Ok(DashboardOverview {
            stats: stats::overview(&orders),
            recent_orders: stats::recent(&orders).to_vec(),
        })
    }

    pub async fn payments_summary(&self) -> AppResult<PaymentsSummary> {
        let orders = self.list_orders().await?;
        Ok(PaymentsSummary {
            total_revenue: stats::settled_revenue(&orders),
            transactions: orders
                .iter()
                .map(|o| PaymentRow {
                    order_id: o.id,
                    created_at: o.created_at,
                    status: o.status,
                    payment: PaymentState::of(o.status),
                    amount: o.total_amount,
                })
                .collect(),
        })
    }
}

/// Notice for an order row that could not be decoded
fn rejected_order(rejected: RejectedRow) -> AppError {
    let id = rejected.row.get("id").cloned().unwrap_or(Value::Null);
    tracing::warn!(order_id = %id, error = %rejected.error, "Skipping unreadable order row");

    let unknown_status = rejected
        .row
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.parse::<OrderStatus>().is_err());
    let code = if unknown_status {
        ErrorCode::OrderStatusInvalid
    } else {
        ErrorCode::InvalidFormat
    };
    AppError::with_message(code, format!("Order {} could not be read: {}", id, rejected.error))
        .with_detail("order_id", id)
}
