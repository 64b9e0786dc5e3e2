//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::null_as_default;

/// Order status
///
/// Any status may move to any other; transitions are an administrative
/// decision and are not validated here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in pipeline order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Delivering,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human label ("Pending", "Delivering", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Delivering => "Delivering",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A selected option on a line entry (e.g. "Extra Spicy")
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// One product line inside an order's denormalized `items` column
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_id: Option<i64>,
    /// Inline display name snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Absent means 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_at_time: Option<Decimal>,
    /// Selected options; entries that are not objects decode as nameless options
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub options: Vec<ItemOption>,
}

impl LineEntry {
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Decode one stored entry field by field
    ///
    /// A field holding a value of the wrong type reads as absent; ids written
    /// as numeric strings are accepted. Values that are not objects yield
    /// `None`.
    pub fn from_stored(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        Some(Self {
            food_id: id_field(&fields, "food_id"),
            side_id: id_field(&fields, "side_id"),
            name: field(&fields, "name"),
            image_url: field(&fields, "image_url"),
            quantity: field(&fields, "quantity"),
            price_at_time: field(&fields, "price_at_time"),
            options: fields.get("options").map(options_from_value).unwrap_or_default(),
        })
    }
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    serde_json::from_value(value.clone()).ok()
}

fn id_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    match fields.get(key)? {
        Value::String(text) => text.trim().parse().ok(),
        value => value.as_i64(),
    }
}

fn options_from_value(value: &Value) -> Vec<ItemOption> {
    match value {
        Value::Array(values) => values
            .iter()
            .map(|v| serde_json::from_value(v.clone()).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<ItemOption>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(options_from_value).unwrap_or_default())
}

/// Stored shapes of an order's `items` column
///
/// Two historical layouts exist: a bare array of line entries, and a wrapper
/// object carrying the array under `items`. Anything else is unrecognized and
/// reads as an empty order. Entries are decoded one at a time so a malformed
/// entry never hides its siblings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemsPayload {
    List(Vec<Value>),
    Wrapped { items: Vec<Value> },
    Unrecognized(Value),
}

impl ItemsPayload {
    /// Resolve to the canonical sequence of line entries
    pub fn into_entries(self) -> Vec<LineEntry> {
        match self {
            ItemsPayload::List(items) | ItemsPayload::Wrapped { items } => {
                items.into_iter().filter_map(LineEntry::from_stored).collect()
            }
            ItemsPayload::Unrecognized(_) => Vec::new(),
        }
    }
}

fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<LineEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ItemsPayload>::deserialize(deserializer)?
        .map(ItemsPayload::into_entries)
        .unwrap_or_default())
}

/// Order entity (`orders` table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    /// Owner reference (profile id)
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: String,
    pub status: OrderStatus,
    /// Total amount in currency unit
    pub total_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Line entries, normalized from either stored shape
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<LineEntry>,
}

impl AsRef<Order> for Order {
    fn as_ref(&self) -> &Order {
        self
    }
}

/// Update status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdateStatus {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_json(items: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 1,
            "user_id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "status": "pending",
            "total_amount": 4500.5,
            "delivery_address": "12 Allen Avenue, Ikeja",
            "created_at": "2026-10-19T10:00:00+00:00",
            "items": items,
        })
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert_eq!(
            "shipped".parse::<OrderStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivering).unwrap(),
            "\"delivering\""
        );
    }

    #[test]
    fn test_items_bare_list() {
        let order: Order = serde_json::from_value(order_json(json!([
            { "quantity": 2, "name": "Jollof Rice" },
            { "food_id": 7 }
        ])))
        .unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name.as_deref(), Some("Jollof Rice"));
        assert_eq!(order.items[1].quantity(), 1);
        assert_eq!(order.items[1].food_id, Some(7));
    }

    #[test]
    fn test_items_wrapper_object() {
        let order: Order = serde_json::from_value(order_json(json!({
            "items": [{ "quantity": 1, "side_id": 3, "options": [{ "name": "Extra Spicy" }] }]
        })))
        .unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].side_id, Some(3));
        assert_eq!(order.items[0].options[0].name.as_deref(), Some("Extra Spicy"));
    }

    #[test]
    fn test_items_absent_null_or_unrecognized() {
        let mut value = order_json(json!(null));
        let order: Order = serde_json::from_value(value.clone()).unwrap();
        assert!(order.items.is_empty());

        value.as_object_mut().unwrap().remove("items");
        let order: Order = serde_json::from_value(value).unwrap();
        assert!(order.items.is_empty());

        let order: Order = serde_json::from_value(order_json(json!("3x rice"))).unwrap();
        assert!(order.items.is_empty());

        let order: Order =
            serde_json::from_value(order_json(json!({ "items": "not a list" }))).unwrap();
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_options_tolerate_null_entries() {
        let order: Order = serde_json::from_value(order_json(json!([
            { "name": "Suya", "options": [null, { "name": "Onions" }, "pepper"] }
        ])))
        .unwrap();

        let options = &order.items[0].options;
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].name, None);
        assert_eq!(options[1].name.as_deref(), Some("Onions"));
        assert_eq!(options[2].name, None);
    }

    #[test]
    fn test_malformed_entry_keeps_its_siblings() {
        let order: Order = serde_json::from_value(order_json(json!([
            { "quantity": 2, "name": "Jollof Rice" },
            { "quantity": 1, "food_id": "7" },
            { "quantity": 1.5, "name": "Chapman" },
            { "quantity": -1, "side_id": 3, "price_at_time": "abc" },
            null,
            "plantain"
        ])))
        .unwrap();

        assert_eq!(order.items.len(), 4);
        assert_eq!(order.items[0].quantity(), 2);
        assert_eq!(order.items[0].name.as_deref(), Some("Jollof Rice"));
        assert_eq!(order.items[1].food_id, Some(7));
        assert_eq!(order.items[2].quantity, None);
        assert_eq!(order.items[2].name.as_deref(), Some("Chapman"));
        assert_eq!(order.items[3].quantity(), 1);
        assert_eq!(order.items[3].side_id, Some(3));
        assert_eq!(order.items[3].price_at_time, None);
    }

    #[test]
    fn test_wrapped_entries_decode_one_by_one() {
        let order: Order = serde_json::from_value(order_json(json!({
            "items": [{ "name": 42 }, { "name": "Egusi", "options": "spicy" }]
        })))
        .unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name, None);
        assert_eq!(order.items[1].name.as_deref(), Some("Egusi"));
        assert!(order.items[1].options.is_empty());
    }

    #[test]
    fn test_null_owner_reference_reads_as_empty() {
        let mut value = order_json(json!([]));
        value["user_id"] = json!(null);
        let order: Order = serde_json::from_value(value).unwrap();
        assert_eq!(order.user_id, "");
    }
}
