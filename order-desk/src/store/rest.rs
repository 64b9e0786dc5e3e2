//! REST backend client
//!
//! One [`BackendClient`] is shared by the row store, the blob store and the
//! authenticator. It carries the project API key on every request and, once
//! signed in, the session's bearer token.

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{DataStore, Filter, Query, StoreError, StoreResult};
use crate::core::Config;

/// Error body returned by PostgREST, storage and auth endpoints
#[derive(Debug, serde::Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl BackendErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.error_description)
            .or(self.msg)
            .or(self.error)
    }
}

/// HTTP client for the hosted backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    pub fn new(config: &Config) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Use a session token for subsequent requests (`None` falls back to the API key)
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach `apikey` and `Authorization` headers
    pub fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .token
            .read()
            .clone()
            .unwrap_or_else(|| self.api_key.clone());
        req.header("apikey", &self.api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", bearer))
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.authorize(self.client.request(method, self.url(path)))
    }

    /// Turn a non-success response into [`StoreError::Api`]
    pub async fn check(response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        let message = serde_json::from_str::<BackendErrorBody>(&text)
            .ok()
            .and_then(BackendErrorBody::into_message)
            .unwrap_or(text);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn json<T: serde::de::DeserializeOwned>(response: Response) -> StoreResult<T> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// [`DataStore`] over the PostgREST API (`/rest/v1/{table}`)
#[derive(Debug, Clone)]
pub struct RestStore {
    client: BackendClient,
}

impl RestStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn table_path(table: &str) -> String {
        format!("rest/v1/{}", table)
    }

    fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
        filters.iter().map(Filter::to_param).collect()
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn select(&self, table: &str, query: &Query) -> StoreResult<Vec<Value>> {
        tracing::debug!(table, ?query, "select");
        let response = self
            .client
            .request(reqwest::Method::GET, &Self::table_path(table))
            .query(&query.to_params())
            .send()
            .await?;
        BackendClient::json(response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> StoreResult<Vec<Value>> {
        tracing::debug!(table, count = rows.len(), "insert");
        let response = self
            .client
            .request(reqwest::Method::POST, &Self::table_path(table))
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;
        BackendClient::json(response).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Value,
        filters: &[Filter],
    ) -> StoreResult<Vec<Value>> {
        tracing::debug!(table, ?filters, "update");
        let response = self
            .client
            .request(reqwest::Method::PATCH, &Self::table_path(table))
            .header("Prefer", "return=representation")
            .query(&Self::filter_params(filters))
            .json(&patch)
            .send()
            .await?;
        BackendClient::json(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<u64> {
        tracing::debug!(table, ?filters, "delete");
        let response = self
            .client
            .request(reqwest::Method::DELETE, &Self::table_path(table))
            .header("Prefer", "return=representation")
            .query(&Self::filter_params(filters))
            .send()
            .await?;
        let removed: Vec<Value> = BackendClient::json(response).await?;
        Ok(removed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let config = Config::with_backend("https://abc.example.co/", "anon");
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://abc.example.co");
        assert_eq!(
            client.url("/rest/v1/orders"),
            "https://abc.example.co/rest/v1/orders"
        );
        assert_eq!(RestStore::table_path("foods"), "rest/v1/foods");
    }

    #[test]
    fn test_error_body_message() {
        let body: BackendErrorBody =
            serde_json::from_str(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));

        let body: BackendErrorBody =
            serde_json::from_str(r#"{"code":"23503","message":"violates foreign key"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("violates foreign key"));
    }
}
