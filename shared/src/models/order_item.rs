//! Order Item Model (`order_items` table, joined with `foods`)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Food;

/// A persisted order line, as shown on the order detail view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemRecord {
    pub id: i64,
    pub order_id: i64,
    pub food_id: Option<i64>,
    pub quantity: i32,
    /// Unit price captured when the order was placed
    pub price_at_time: Decimal,
    /// Free-form options blob
    #[serde(default)]
    pub options: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    // -- Relations (present when selected with `foods(*)`) --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foods: Option<Food>,
}

impl OrderItemRecord {
    pub fn display_name(&self) -> &str {
        self.foods
            .as_ref()
            .map(|f| f.name.as_str())
            .unwrap_or("Unknown Item")
    }

    /// `price_at_time × quantity`
    pub fn line_total(&self) -> Decimal {
        self.price_at_time * Decimal::from(self.quantity)
    }
}
