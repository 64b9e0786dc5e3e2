//! Row selection: column list, filters, ordering, limit

use chrono::DateTime;
use serde_json::Value;
use std::cmp::Ordering;

/// Row predicate on a single column
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq(String, Value),
    /// `column in (values)`
    In(String, Vec<Value>),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Filter::In(column.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(column, _) | Filter::In(column, _) => column,
        }
    }

    /// Evaluate against a JSON row (missing columns never match)
    pub fn matches(&self, row: &Value) -> bool {
        let Some(cell) = row.get(self.column()) else {
            return false;
        };
        match self {
            Filter::Eq(_, value) => values_equal(cell, value),
            Filter::In(_, values) => values.iter().any(|v| values_equal(cell, v)),
        }
    }

    /// PostgREST query parameter, e.g. `("id", "eq.5")` or `("id", "in.(\"a\",\"b\")")`
    pub fn to_param(&self) -> (String, String) {
        match self {
            Filter::Eq(column, value) => (column.clone(), format!("eq.{}", plain(value))),
            Filter::In(column, values) => {
                let list = values.iter().map(quoted).collect::<Vec<_>>().join(",");
                (column.clone(), format!("in.({})", list))
            }
        }
    }
}

/// Numbers compare by value so `5` matches `5.0`; integers compare exactly
fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn quoted(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s.replace('"', "\\\"")),
        other => other.to_string(),
    }
}

/// Sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    /// Compare two rows on this key (rows without the column sort last)
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ord = match (a.get(&self.column), b.get(&self.column)) {
            (Some(x), Some(y)) => compare_values(x, y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if self.ascending { ord } else { ord.reverse() }
    }

    pub fn to_param(&self) -> String {
        let dir = if self.ascending { "asc" } else { "desc" };
        format!("{}.{}", self.column, dir)
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => x.cmp(y),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// A `select` request
///
/// ```
/// use order_desk::store::Query;
///
/// let query = Query::new()
///     .columns("*, foods(*)")
///     .eq("order_id", 42)
///     .order_by("created_at", false);
/// assert_eq!(query.filters.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    /// Column list (`*` when unset); may embed related tables like `categories(name)`
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn is_in<V: Into<Value>>(
        self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filter(Filter::is_in(column, values))
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Newest rows first
    pub fn newest_first() -> Self {
        Self::new().order_by("created_at", false)
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// PostgREST query string parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![(
            "select".to_string(),
            self.columns
                .as_deref()
                .map(|c| c.replace(' ', ""))
                .unwrap_or_else(|| "*".to_string()),
        )];
        params.extend(self.filters.iter().map(Filter::to_param));
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.to_param()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches() {
        let row = json!({ "id": 5, "user_id": "abc", "status": "pending" });
        assert!(Filter::eq("id", 5).matches(&row));
        assert!(Filter::eq("id", 5.0).matches(&row));
        assert!(!Filter::eq("id", 6).matches(&row));
        assert!(Filter::is_in("user_id", ["x", "abc"]).matches(&row));
        assert!(!Filter::is_in("user_id", Vec::<String>::new()).matches(&row));
        assert!(!Filter::eq("missing", 1).matches(&row));
    }

    #[test]
    fn test_large_ids_match_exactly() {
        // Both ids round to the same f64
        let big = 9_007_199_254_740_993_i64;
        let row = json!({ "id": big });
        assert!(Filter::eq("id", big).matches(&row));
        assert!(!Filter::eq("id", big - 1).matches(&row));
        assert!(!Filter::is_in("id", [big + 1]).matches(&row));

        let unsigned = json!({ "id": u64::MAX });
        assert!(Filter::eq("id", u64::MAX).matches(&unsigned));
        assert!(!Filter::eq("id", u64::MAX - 1).matches(&unsigned));
    }

    #[test]
    fn test_postgrest_params() {
        let query = Query::new()
            .columns("id, full_name, phone_number, email")
            .is_in("id", ["a1", "b2"])
            .eq("status", "pending")
            .order_by("created_at", false)
            .limit(5);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".to_string(), "id,full_name,phone_number,email".to_string()),
                ("id".to_string(), "in.(\"a1\",\"b2\")".to_string()),
                ("status".to_string(), "eq.pending".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_order_by_compare() {
        let newer = json!({ "created_at": "2026-10-19T10:00:00+00:00" });
        let older = json!({ "created_at": "2026-10-18T10:00:00+00:00" });
        let order = OrderBy {
            column: "created_at".into(),
            ascending: false,
        };
        assert_eq!(order.compare(&newer, &older), Ordering::Less);

        // Instants compare by time, not by text
        let shifted = json!({ "created_at": "2026-10-18T11:30:00+01:00" });
        let utc = json!({ "created_at": "2026-10-18T10:00:00Z" });
        assert_eq!(order.compare(&shifted, &utc), Ordering::Greater);

        let by_id = OrderBy {
            column: "id".into(),
            ascending: true,
        };
        assert_eq!(by_id.compare(&json!({"id": 2}), &json!({"id": 10})), Ordering::Less);
    }
}
