//! Order list view state
//!
//! The selected filters are an explicit value: every interaction produces a
//! fresh [`OrderViewState`] instead of mutating the current one, so the filter
//! logic can run (and be tested) without any UI around it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{OrderStatus, UnknownStatus};

/// Status filter: everything, or one concrete status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        StatusFilter::Only(status)
    }
}

/// Date-range rule applied to the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Yesterday,
    /// Monday 00:00 through Sunday 23:59:59.999 of the current week
    ThisWeek,
    /// Midnight six days ago through now
    #[serde(rename = "last_7_days")]
    Last7Days,
    /// A single calendar day picked by the operator
    Custom,
}

impl DateFilter {
    pub const ALL: [DateFilter; 6] = [
        DateFilter::All,
        DateFilter::Today,
        DateFilter::Yesterday,
        DateFilter::ThisWeek,
        DateFilter::Last7Days,
        DateFilter::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::All => "all",
            DateFilter::Today => "today",
            DateFilter::Yesterday => "yesterday",
            DateFilter::ThisWeek => "this_week",
            DateFilter::Last7Days => "last_7_days",
            DateFilter::Custom => "custom",
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown date filter
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown date filter: {0}")]
pub struct UnknownDateFilter(pub String);

impl FromStr for DateFilter {
    type Err = UnknownDateFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFilter::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownDateFilter(s.to_string()))
    }
}

/// Selected filters of the order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderViewState {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub date: DateFilter,
    /// Only meaningful while `date` is [`DateFilter::Custom`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_date: Option<NaiveDate>,
}

impl OrderViewState {
    pub fn with_status(self, status: impl Into<StatusFilter>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }

    /// Switch the date mode. Leaving custom mode drops the picked day.
    pub fn with_date_filter(self, date: DateFilter) -> Self {
        let custom_date = match date {
            DateFilter::Custom => self.custom_date,
            _ => None,
        };
        Self {
            date,
            custom_date,
            ..self
        }
    }

    pub fn with_custom_date(self, day: Option<NaiveDate>) -> Self {
        Self {
            custom_date: day,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_serde() {
        assert_eq!(
            serde_json::to_string(&StatusFilter::All).unwrap(),
            "\"all\""
        );
        assert_eq!(
            serde_json::to_string(&StatusFilter::Only(OrderStatus::Preparing)).unwrap(),
            "\"preparing\""
        );
        let parsed: StatusFilter = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, StatusFilter::Only(OrderStatus::Cancelled));
        assert!(serde_json::from_str::<StatusFilter>("\"lost\"").is_err());
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(OrderStatus::Delivered));
        assert!(StatusFilter::Only(OrderStatus::Pending).matches(OrderStatus::Pending));
        assert!(!StatusFilter::Only(OrderStatus::Pending).matches(OrderStatus::Confirmed));
    }

    #[test]
    fn test_date_filter_tags() {
        assert_eq!(
            serde_json::to_string(&DateFilter::Last7Days).unwrap(),
            "\"last_7_days\""
        );
        assert_eq!(
            serde_json::to_string(&DateFilter::ThisWeek).unwrap(),
            "\"this_week\""
        );
        for mode in DateFilter::ALL {
            assert_eq!(mode.as_str().parse::<DateFilter>(), Ok(mode));
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn test_leaving_custom_clears_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 12);
        let state = OrderViewState::default()
            .with_date_filter(DateFilter::Custom)
            .with_custom_date(day);
        assert_eq!(state.custom_date, day);

        let again = state.with_date_filter(DateFilter::Custom);
        assert_eq!(again.custom_date, day);

        let today = state.with_date_filter(DateFilter::Today);
        assert_eq!(today.custom_date, None);
        assert_eq!(state.custom_date, day);
    }

    #[test]
    fn test_view_state_deserialize_defaults() {
        let state: OrderViewState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, OrderViewState::default());

        let state: OrderViewState = serde_json::from_str(
            r#"{"status":"pending","date":"custom","custom_date":"2026-10-12"}"#,
        )
        .unwrap();
        assert_eq!(state.status, StatusFilter::Only(OrderStatus::Pending));
        assert_eq!(state.date, DateFilter::Custom);
        assert_eq!(state.custom_date, NaiveDate::from_ymd_opt(2026, 10, 12));
    }
}
