//! Persistence collaborator for transcoded images

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::SystemTime;

use crate::fingerprint::fingerprint;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Image '{id}' not found")]
    NotFound { id: String },

    #[error("Image store failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    pub fn to_http_status(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::Backend(_) => 500,
        }
    }
}

/// A persisted, gzip-compressed image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub id: String,
    /// Gzip stream of the transcoded image
    pub compressed: Bytes,
    /// Canonical mimetype of the transcoded image
    pub content_type: String,
    /// Quoted fingerprint of `compressed`
    pub etag: String,
    pub stored_at: SystemTime,
}

/// Byte store for uploaded images
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `compressed` under `id`, replacing any previous value
    async fn put(&self, id: &str, compressed: Bytes, content_type: &str) -> Result<(), StoreError>;

    /// Fetch the image stored under `id`
    async fn get(&self, id: &str) -> Result<StoredImage, StoreError>;
}

/// In-process image store
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: RwLock<HashMap<String, StoredImage>>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, id: &str, compressed: Bytes, content_type: &str) -> Result<(), StoreError> {
        let image = StoredImage {
            id: id.to_string(),
            etag: fingerprint(&compressed),
            compressed,
            content_type: content_type.to_string(),
            stored_at: SystemTime::now(),
        };
        self.images.write().insert(id.to_string(), image);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<StoredImage, StoreError> {
        self.images
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }
}
