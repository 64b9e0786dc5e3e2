//! Store Module
//!
//! The hosted backend is reached through three collaborators:
//!
//! - [`DataStore`]: table rows with `select / insert / update / delete`
//! - [`BlobStore`]: image objects with `upload / public_url`
//! - [`Authenticator`]: password sign-in
//!
//! Each has an in-memory implementation (tests, offline runs) and a REST
//! implementation speaking the PostgREST / storage / auth HTTP APIs.

pub mod auth;
pub mod blob;
pub mod memory;
pub mod query;
pub mod rest;

pub use auth::{Authenticator, RestAuthenticator, Session, SessionUser};
pub use blob::{BlobStore, MemoryBlobStore, RestBlobStore};
pub use memory::MemoryStore;
pub use query::{Filter, OrderBy, Query};
pub use rest::{BackendClient, RestStore};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, e.to_string())
            }
            StoreError::Http(e) => AppError::network(e.to_string()),
            StoreError::Api { status, message } => match status {
                400 => AppError::invalid_request(message),
                401 | 403 => AppError::with_message(ErrorCode::NotAuthenticated, message),
                404 => AppError::with_message(ErrorCode::NotFound, message),
                409 => AppError::with_message(ErrorCode::AlreadyExists, message),
                _ => AppError::database(message).with_detail("status", status),
            },
            StoreError::Serialization(e) => {
                AppError::with_message(ErrorCode::InvalidFormat, e.to_string())
            }
            StoreError::NotFound(what) => AppError::not_found(what),
            StoreError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Row store of the hosted backend
///
/// Rows travel as JSON objects; typed access goes through [`DataStoreExt`].
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Rows of `table` matching `query`
    async fn select(&self, table: &str, query: &Query) -> StoreResult<Vec<Value>>;

    /// Insert rows, returning them as stored (with generated ids)
    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>>;

    /// Merge `patch` into every row matching `filters`, returning the updated rows
    async fn update(&self, table: &str, patch: Value, filters: &[Filter])
    -> StoreResult<Vec<Value>>;

    /// Remove every row matching `filters`, returning how many went away
    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<u64>;
}

/// A fetched row that did not decode into the requested type
#[derive(Debug)]
pub struct RejectedRow {
    /// The raw row as returned by the store
    pub row: Value,
    pub error: serde_json::Error,
}

/// Rows of one fetch, split into decoded and rejected
#[derive(Debug)]
pub struct Decoded<T> {
    pub rows: Vec<T>,
    pub rejected: Vec<RejectedRow>,
}

/// Typed helpers over any [`DataStore`]
#[async_trait]
pub trait DataStoreExt: DataStore {
    async fn fetch<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        query: &Query,
    ) -> StoreResult<Vec<T>> {
        let rows = self.select(table, query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    /// Like [`DataStoreExt::fetch`], but a row that does not decode is set
    /// aside instead of failing the whole fetch
    async fn fetch_each<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        query: &Query,
    ) -> StoreResult<Decoded<T>> {
        let mut decoded = Decoded {
            rows: Vec::new(),
            rejected: Vec::new(),
        };
        for row in self.select(table, query).await? {
            match serde_json::from_value::<T>(row.clone()) {
                Ok(value) => decoded.rows.push(value),
                Err(error) => decoded.rejected.push(RejectedRow { row, error }),
            }
        }
        Ok(decoded)
    }

    async fn fetch_one<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        query: &Query,
    ) -> StoreResult<Option<T>> {
        let query = query.clone().limit(1);
        Ok(self.fetch(table, &query).await?.into_iter().next())
    }

    async fn insert_one<B, T>(&self, table: &str, body: &B) -> StoreResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let row = serde_json::to_value(body)?;
        let created = self.insert(table, vec![row]).await?;
        let first = created
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("inserted {} row", table)))?;
        Ok(serde_json::from_value(first)?)
    }

    async fn update_where<B: Serialize + Sync>(
        &self,
        table: &str,
        body: &B,
        filters: &[Filter],
    ) -> StoreResult<Vec<Value>> {
        let patch = serde_json::to_value(body)?;
        self.update(table, patch, filters).await
    }
}

impl<S: DataStore + ?Sized> DataStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Named {
        id: i64,
        name: String,
    }

    #[tokio::test]
    async fn test_fetch_each_sets_bad_rows_aside() {
        let store = MemoryStore::new();
        store.seed(
            "categories",
            [
                serde_json::json!({ "id": 1, "name": "Rice" }),
                serde_json::json!({ "id": 2, "name": null }),
                serde_json::json!({ "id": 3, "name": "Soups" }),
            ],
        );
        let query = Query::new().order_by("id", true);

        let decoded = store.fetch_each::<Named>("categories", &query).await.unwrap();
        let names: Vec<(i64, &str)> = decoded.rows.iter().map(|r| (r.id, r.name.as_str())).collect();
        assert_eq!(names, vec![(1, "Rice"), (3, "Soups")]);
        assert_eq!(decoded.rejected.len(), 1);
        assert_eq!(decoded.rejected[0].row["id"], 2);

        assert!(store.fetch::<Named>("categories", &query).await.is_err());
    }

    #[test]
    fn test_store_error_to_app_error() {
        let err: AppError = StoreError::Api {
            status: 401,
            message: "JWT expired".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
        assert_eq!(err.message, "JWT expired");

        let err: AppError = StoreError::Api {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.details.unwrap().get("status").unwrap(), 500);

        let err: AppError = StoreError::Api {
            status: 400,
            message: "invalid input syntax for type bigint".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let err: AppError = StoreError::NotFound("orders 9".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = StoreError::Validation("bad filter".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
