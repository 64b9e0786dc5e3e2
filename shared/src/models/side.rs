//! Side / Add-on Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side type used when a row carries none
pub const DEFAULT_SIDE_TYPE: &str = "side";

/// Accepted side types, in display order
pub const SIDE_TYPES: [&str; 4] = ["side", "protein", "drink", "extra"];

/// Side entity (drinks, extras, proteins, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Side {
    pub id: i64,
    pub name: String,
    /// Price in currency unit
    pub price: Decimal,
    /// Grouping label, e.g. "side", "drink", "protein"
    #[serde(rename = "type", default)]
    pub side_type: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Side {
    pub fn side_type(&self) -> &str {
        self.side_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SIDE_TYPE)
    }
}

/// Create / update side payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideUpsert {
    pub name: String,
    pub price: Decimal,
    #[serde(rename = "type", default = "default_side_type")]
    pub side_type: String,
    #[serde(default)]
    pub image_url: String,
}

fn default_side_type() -> String {
    DEFAULT_SIDE_TYPE.to_string()
}
