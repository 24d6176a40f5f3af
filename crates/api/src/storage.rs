//! Object storage integration for screenshot binaries.
//!
//! The catalog stores only public URLs; the bytes live in a storage
//! bucket. Uploads happen on image creation, deletions happen when an
//! image or a whole dapp is removed.

use async_trait::async_trait;
use serde_json::json;

use crate::config::SupabaseConfig;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object storage is not configured")]
    NotConfigured,

    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage returned HTTP {0}")]
    HttpStatus(u16),
}

/// Outcome of one object in a batch delete.
#[derive(Debug, Clone)]
pub struct ObjectDeleteResult {
    pub path: String,
    pub deleted: bool,
}

/// Storage backend for screenshot objects, keyed by bucket-relative path
/// (`{dapp_id}/{file}`).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload an object and return its public URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Delete a batch of objects. Per-object failures are reported in the
    /// result rather than failing the whole batch.
    async fn delete(&self, paths: &[String]) -> Result<Vec<ObjectDeleteResult>, StorageError>;

    /// The public URL an uploaded object is served from.
    fn public_url(&self, path: &str) -> String;
}

/// Supabase Storage backend, using the service-role key.
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Build a backend from config; `None` when the URL or key is missing.
    pub fn from_config(config: &SupabaseConfig) -> Option<Self> {
        let base_url = config.url.clone()?;
        let service_key = config.service_key.clone()?;
        Some(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .http
            .post(format!(
                "{}/storage/v1/object/{}/{}",
                self.base_url, self.bucket, path
            ))
            .bearer_auth(&self.service_key)
            .header("content-type", content_type.to_string())
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::HttpStatus(response.status().as_u16()));
        }
        Ok(self.public_url(path))
    }

    async fn delete(&self, paths: &[String]) -> Result<Vec<ObjectDeleteResult>, StorageError> {
        let response = self
            .http
            .delete(format!("{}/storage/v1/object/{}", self.base_url, self.bucket))
            .bearer_auth(&self.service_key)
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::HttpStatus(response.status().as_u16()));
        }
        Ok(paths
            .iter()
            .map(|path| ObjectDeleteResult {
                path: path.clone(),
                deleted: true,
            })
            .collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

/// Backend used when storage is not configured. Uploads fail; deletes
/// report failure per object so catalog cleanup still proceeds.
pub struct DisabledStorage;

#[async_trait]
impl ObjectStorage for DisabledStorage {
    async fn upload(
        &self,
        _path: &str,
        _bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured)
    }

    async fn delete(&self, _paths: &[String]) -> Result<Vec<ObjectDeleteResult>, StorageError> {
        Err(StorageError::NotConfigured)
    }

    fn public_url(&self, path: &str) -> String {
        path.to_string()
    }
}
