//! Customer Profile Model

use serde::{Deserialize, Serialize};

/// Customer contact metadata, keyed by the same id orders use as `user_id`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl Profile {
    /// Columns fetched for the order list join
    pub const COLUMNS: &'static str = "id, full_name, phone_number, email";
}
