//! Image Service
//!
//! Uploads food and side pictures to the configured bucket under a random
//! file name that keeps the original extension, and hands back the public URL
//! to store on the row.

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::store::BlobStore;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Where an upload landed
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadedImage {
    /// Object path inside the bucket
    pub path: String,
    pub public_url: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Clone)]
pub struct ImageService {
    blobs: Arc<dyn BlobStore>,
    bucket: String,
}

impl std::fmt::Debug for ImageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageService")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl ImageService {
    pub fn new(blobs: Arc<dyn BlobStore>, bucket: impl Into<String>) -> Self {
        Self {
            blobs,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload `data` that was picked as `original_name`
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(&self, original_name: &str, data: Vec<u8>) -> AppResult<UploadedImage> {
        let ext = validate_upload(original_name, &data)?;

        let path = format!("{}.{}", Uuid::new_v4(), ext);
        let content_type = mime_guess::from_ext(&ext)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let size = data.len();

        self.blobs
            .upload(&self.bucket, &path, data, &content_type)
            .await
            .map_err(|e| {
                tracing::error!(path = %path, error = %e, "Error uploading image");
                AppError::new(ErrorCode::FileStorageFailed).with_detail("reason", e.to_string())
            })?;

        let public_url = self.blobs.public_url(&self.bucket, &path);
        tracing::info!(path = %path, "Image uploaded");
        Ok(UploadedImage {
            path,
            public_url,
            content_type,
            size,
        })
    }

    /// Read a local file and upload it
    pub async fn upload_file(&self, file: &Path) -> AppResult<UploadedImage> {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
        let data = tokio::fs::read(file).await.map_err(|e| {
            AppError::new(ErrorCode::NoFileProvided)
                .with_detail("path", file.display().to_string())
                .with_detail("reason", e.to_string())
        })?;
        self.upload(name, data).await
    }
}

/// Check name and payload; returns the lower-cased extension
fn validate_upload(original_name: &str, data: &[u8]) -> AppResult<String> {
    if original_name.trim().is_empty() {
        return Err(AppError::new(ErrorCode::NoFilename));
    }
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let ext = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFileExtension,
                format!("Invalid file extension for: {}", original_name),
            )
        })?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::InvalidFileExtension,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }
    Ok(ext)
}
