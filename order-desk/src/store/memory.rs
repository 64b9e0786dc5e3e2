//! In-memory row store
//!
//! Mirrors the subset of PostgREST behaviour the desk relies on: generated
//! integer ids, a `created_at` default, column projection, and one level of
//! embedded relations (`categories(name)` resolves through `category_id`).

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

use super::{DataStore, Filter, Query, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Value>,
    next_id: i64,
}

impl Table {
    fn bump_id(&mut self, row: &Value) {
        if let Some(id) = row.get("id").and_then(Value::as_i64) {
            self.next_id = self.next_id.max(id);
        }
    }
}

/// Thread-safe in-memory [`DataStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rows verbatim (ids and timestamps are kept as given)
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Value>) {
        let mut tables = self.tables.write();
        let entry = tables.entry(table.to_string()).or_default();
        for row in rows {
            entry.bump_id(&row);
            entry.rows.push(row);
        }
    }

    /// Snapshot of a table's rows in insertion order
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .read()
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Make every operation on `table` fail until [`MemoryStore::heal_table`]
    pub fn fail_table(&self, table: &str) {
        self.failing.write().insert(table.to_string());
    }

    pub fn heal_table(&self, table: &str) {
        self.failing.write().remove(table);
    }

    fn check(&self, table: &str) -> StoreResult<()> {
        if self.failing.read().contains(table) {
            return Err(StoreError::Api {
                status: 503,
                message: format!("relation \"{}\" is unavailable", table),
            });
        }
        Ok(())
    }

    fn project(&self, tables: &HashMap<String, Table>, row: &Value, columns: &[Column]) -> Value {
        let Some(source) = row.as_object() else {
            return row.clone();
        };
        let mut out = Map::new();
        for column in columns {
            match column {
                Column::All => out.extend(source.clone()),
                Column::Named(name) => {
                    out.insert(name.clone(), source.get(name).cloned().unwrap_or(Value::Null));
                }
                Column::Embed { relation, columns } => {
                    let key = foreign_key(relation);
                    let related = source
                        .get(&key)
                        .filter(|v| !v.is_null())
                        .and_then(|fk| {
                            tables.get(relation.as_str()).and_then(|t| {
                                t.rows
                                    .iter()
                                    .find(|r| Filter::Eq("id".into(), fk.clone()).matches(r))
                            })
                        })
                        .map(|r| self.project(tables, r, columns))
                        .unwrap_or(Value::Null);
                    out.insert(relation.clone(), related);
                }
            }
        }
        Value::Object(out)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Column {
    All,
    Named(String),
    Embed {
        relation: String,
        columns: Vec<Column>,
    },
}

/// Parse a PostgREST column list (`*, categories(name)`)
fn parse_columns(list: &str) -> Vec<Column> {
    split_top_level(list)
        .into_iter()
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            if part == "*" {
                return Some(Column::All);
            }
            if let Some(open) = part.find('(')
                && part.ends_with(')')
            {
                return Some(Column::Embed {
                    relation: part[..open].trim().to_string(),
                    columns: parse_columns(&part[open + 1..part.len() - 1]),
                });
            }
            Some(Column::Named(part.to_string()))
        })
        .collect()
}

fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// `categories` -> `category_id`, `foods` -> `food_id`
fn foreign_key(relation: &str) -> String {
    let singular = if let Some(stem) = relation.strip_suffix("ies") {
        format!("{}y", stem)
    } else if let Some(stem) = relation.strip_suffix('s') {
        stem.to_string()
    } else {
        relation.to_string()
    };
    format!("{}_id", singular)
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> StoreResult<Vec<Value>> {
        self.check(table)?;
        let tables = self.tables.read();
        let Some(source) = tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Value> = source.rows.iter().filter(|r| query.matches(r)).collect();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| order.compare(a, b));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let columns = parse_columns(query.columns.as_deref().unwrap_or("*"));
        Ok(rows
            .into_iter()
            .map(|r| self.project(&tables, r, &columns))
            .collect())
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        self.check(table)?;
        let mut tables = self.tables.write();
        let entry = tables.entry(table.to_string()).or_default();

        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut fields) = row else {
                return Err(StoreError::Validation(format!(
                    "{} rows must be JSON objects",
                    table
                )));
            };
            if fields.get("id").is_none_or(Value::is_null) {
                entry.next_id += 1;
                fields.insert("id".into(), Value::from(entry.next_id));
            }
            if fields.get("created_at").is_none_or(Value::is_null) {
                fields.insert(
                    "created_at".into(),
                    Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)),
                );
            }
            let row = Value::Object(fields);
            entry.bump_id(&row);
            entry.rows.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: &[Filter],
    ) -> StoreResult<Vec<Value>> {
        self.check(table)?;
        let Value::Object(patch) = patch else {
            return Err(StoreError::Validation("update patch must be an object".into()));
        };
        let mut tables = self.tables.write();
        let Some(entry) = tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in entry
            .rows
            .iter_mut()
            .filter(|r| filters.iter().all(|f| f.matches(r)))
        {
            if let Value::Object(fields) = row {
                fields.extend(patch.clone());
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<u64> {
        self.check(table)?;
        let mut tables = self.tables.write();
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = entry.rows.len();
        entry.rows.retain(|r| !filters.iter().all(|f| f.matches(r)));
        Ok((before - entry.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_ids_after_seeded_rows() {
        let store = MemoryStore::new();
        store.seed("categories", [json!({ "id": 4, "name": "Rice" })]);

        let created = store
            .insert("categories", vec![json!({ "name": "Soups" })])
            .await
            .unwrap();
        assert_eq!(created[0]["id"], 5);
        assert!(created[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_select_projects_and_embeds() {
        let store = MemoryStore::new();
        store.seed("categories", [json!({ "id": 1, "name": "Rice" })]);
        store.seed(
            "foods",
            [
                json!({ "id": 10, "name": "Jollof", "category_id": 1 }),
                json!({ "id": 11, "name": "Water", "category_id": null }),
            ],
        );

        let rows = store
            .select(
                "foods",
                &Query::new().columns("*, categories(name)").order_by("id", true),
            )
            .await
            .unwrap();
        assert_eq!(rows[0]["categories"], json!({ "name": "Rice" }));
        assert_eq!(rows[0]["name"], "Jollof");
        assert!(rows[1]["categories"].is_null());

        let rows = store
            .select("foods", &Query::new().columns("id").eq("id", 11))
            .await
            .unwrap();
        assert_eq!(rows, vec![json!({ "id": 11 })]);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_filter() {
        let store = MemoryStore::new();
        store.seed(
            "food_sides",
            [
                json!({ "id": 1, "food_id": 3, "side_id": 1 }),
                json!({ "id": 2, "food_id": 3, "side_id": 2 }),
                json!({ "id": 3, "food_id": 4, "side_id": 1 }),
            ],
        );

        let updated = store
            .update("food_sides", json!({ "side_id": 9 }), &[Filter::eq("id", 3)])
            .await
            .unwrap();
        assert_eq!(updated[0]["side_id"], 9);

        let removed = store
            .delete("food_sides", &[Filter::eq("food_id", 3)])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.rows("food_sides").len(), 1);

        let none = store
            .update("food_sides", json!({ "side_id": 1 }), &[Filter::eq("id", 99)])
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_failing_table() {
        let store = MemoryStore::new();
        store.fail_table("profiles");
        let err = store.select("profiles", &Query::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 503, .. }));

        store.heal_table("profiles");
        assert!(store.select("profiles", &Query::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_columns() {
        assert_eq!(
            parse_columns("*, foods(id, name)"),
            vec![
                Column::All,
                Column::Embed {
                    relation: "foods".into(),
                    columns: vec![Column::Named("id".into()), Column::Named("name".into())],
                },
            ]
        );
        assert_eq!(foreign_key("categories"), "category_id");
        assert_eq!(foreign_key("foods"), "food_id");
    }
}
