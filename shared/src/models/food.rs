//! Food Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CategoryName;

/// Food entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Food {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Price in currency unit
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,

    // -- Relations (present when selected with `categories(name)`) --
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryName>,
}

impl Food {
    pub fn category_name(&self) -> Option<&str> {
        self.categories.as_ref().map(|c| c.name.as_str())
    }
}

/// Create / update food payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodUpsert {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    pub category_id: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Food ↔ side link (`food_sides` junction table)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodSide {
    pub food_id: i64,
    pub side_id: i64,
}
