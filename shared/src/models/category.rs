//! Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Create / rename category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryUpsert {
    pub name: String,
}

/// Joined `categories(name)` projection on a food row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryName {
    pub name: String,
}
