//! Profile join
//!
//! Orders reference their customer by `user_id`; contact details live in
//! `profiles`. The join is done client-side after one bulk lookup, and a
//! missing profile is a normal state rather than an error.

use serde::{Deserialize, Serialize};
use shared::models::{Order, Profile};
use shared::util::short_ref;
use std::collections::{HashMap, HashSet};

pub const UNKNOWN_CUSTOMER: &str = "Unknown customer";
pub const NO_PHONE: &str = "No phone";
pub const NO_EMAIL: &str = "No email";

/// An order paired with its customer's profile (if one was found)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardOrder {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "profiles", default)]
    pub profile: Option<Profile>,
}

impl DashboardOrder {
    pub fn new(order: Order, profile: Option<Profile>) -> Self {
        Self { order, profile }
    }

    pub fn customer_name(&self) -> &str {
        self.profile_field(|p| p.full_name.as_deref())
            .unwrap_or(UNKNOWN_CUSTOMER)
    }

    pub fn phone(&self) -> &str {
        self.profile_field(|p| p.phone_number.as_deref())
            .unwrap_or(NO_PHONE)
    }

    pub fn email(&self) -> &str {
        self.profile_field(|p| p.email.as_deref())
            .unwrap_or(NO_EMAIL)
    }

    /// Shortened owner reference, e.g. `0f8fad5b...`
    pub fn owner_ref(&self) -> String {
        short_ref(&self.order.user_id)
    }

    fn profile_field<'a>(&'a self, field: impl Fn(&'a Profile) -> Option<&'a str>) -> Option<&'a str> {
        self.profile
            .as_ref()
            .and_then(field)
            .filter(|v| !v.is_empty())
    }
}

impl AsRef<Order> for DashboardOrder {
    fn as_ref(&self) -> &Order {
        &self.order
    }
}

/// Distinct non-empty owner references, first-seen order
pub fn distinct_owner_refs(orders: &[Order]) -> Vec<&str> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .map(|o| o.user_id.as_str())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .collect()
}

/// Pair each order with the profile sharing its owner reference
pub fn join_profiles(orders: Vec<Order>, profiles: Vec<Profile>) -> Vec<DashboardOrder> {
    let by_id: HashMap<String, Profile> =
        profiles.into_iter().map(|p| (p.id.clone(), p)).collect();
    orders
        .into_iter()
        .map(|order| {
            let profile = by_id.get(&order.user_id).cloned();
            DashboardOrder::new(order, profile)
        })
        .collect()
}
