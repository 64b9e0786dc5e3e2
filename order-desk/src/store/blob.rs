//! Image object storage

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{BackendClient, StoreError, StoreResult};

/// Object storage for uploaded images
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` at `bucket/path`; an existing object is never overwritten
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<()>;

    /// Publicly reachable URL of `bucket/path`
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Uploaded object held by [`MemoryBlobStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-memory [`BlobStore`]
#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, bucket: &str, path: &str) -> Option<StoredBlob> {
        self.objects.read().get(&object_key(bucket, path)).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("http://localhost:54321")
    }
}

fn object_key(bucket: &str, path: &str) -> String {
    format!("{}/{}", bucket, path.trim_start_matches('/'))
}

fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}",
        base_url,
        object_key(bucket, path)
    )
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<()> {
        let key = object_key(bucket, path);
        let mut objects = self.objects.write();
        if objects.contains_key(&key) {
            return Err(StoreError::Api {
                status: 409,
                message: "The resource already exists".into(),
            });
        }
        objects.insert(
            key,
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }
}

/// [`BlobStore`] over the storage API (`/storage/v1/object/{bucket}/{path}`)
#[derive(Debug, Clone)]
pub struct RestBlobStore {
    client: BackendClient,
}

impl RestBlobStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStore for RestBlobStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StoreResult<()> {
        tracing::debug!(bucket, path, size = data.len(), "upload object");
        let response = self
            .client
            .request(
                reqwest::Method::POST,
                &format!("storage/v1/object/{}", object_key(bucket, path)),
            )
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;
        BackendClient::check(response).await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(self.client.base_url(), bucket, path)
    }
}
