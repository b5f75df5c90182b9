//! Upload and download of transcoded images

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::gate::{parse_content_length, UploadGate};
use super::store::ImageStore;
use crate::cache::ResourceClass;
use crate::compression::compress;
use crate::config::{CacheControlConfig, Config};
use crate::delivery::{error_response, json_response, respond};
use crate::error::ServiceError;
use crate::transcode::ImageTranscoder;

/// Returned to the client after a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Identifier the image can be downloaded under
    #[serde(rename = "fileName")]
    pub id: String,
}

/// Gate, transcode, compress and persist uploaded images
pub struct UploadService {
    gate: UploadGate,
    transcoder: ImageTranscoder,
    store: Arc<dyn ImageStore>,
    cache_control: CacheControlConfig,
}

impl UploadService {
    pub fn new(
        gate: UploadGate,
        transcoder: ImageTranscoder,
        store: Arc<dyn ImageStore>,
        cache_control: CacheControlConfig,
    ) -> Self {
        Self {
            gate,
            transcoder,
            store,
            cache_control,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn ImageStore>) -> Self {
        Self::new(
            UploadGate::from_config(&config.uploads),
            ImageTranscoder::from_config(&config.uploads),
            store,
            config.cache_control.clone(),
        )
    }

    /// Admit, transcode and store an upload
    ///
    /// `headers` supplies the declared `Content-Type` and `Content-Length`.
    /// The actual body length is held to the same ceiling as the declared one.
    pub async fn upload(
        &self,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<UploadReceipt, ServiceError> {
        let declared_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let declared_length =
            parse_content_length(headers.get(CONTENT_LENGTH).and_then(|v| v.to_str().ok()));

        let kind = self
            .gate
            .admit(declared_type, declared_length)
            .into_result()
            .map_err(|e| {
                tracing::info!(
                    content_type = %declared_type,
                    content_length = ?declared_length,
                    reason = %e,
                    "Upload rejected"
                );
                e
            })?;
        self.gate.check_size(body.len() as u64).map_err(|e| {
            tracing::info!(
                declared_length = ?declared_length,
                actual_length = body.len(),
                "Upload body exceeds limit"
            );
            e
        })?;

        let transcoder = self.transcoder;
        let original_bytes = body.len();
        let start = Instant::now();
        let compressed = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ServiceError> {
            let transcoded = transcoder.transcode_kind(kind, &body)?;
            Ok(compress(&transcoded)?)
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("transcode task failed: {}", e)))??;

        let id = uuid::Uuid::new_v4().to_string();
        let stored_bytes = compressed.len();
        self.store
            .put(&id, Bytes::from(compressed), kind.content_type())
            .await?;

        tracing::info!(
            id = %id,
            format = %kind,
            original_bytes,
            stored_bytes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Image uploaded"
        );
        Ok(UploadReceipt { id })
    }

    /// `upload` rendered as an HTTP response
    pub async fn handle_upload(&self, headers: &HeaderMap, body: Bytes) -> Response<Bytes> {
        match self.upload(headers, body).await {
            Ok(receipt) => json_response(200, &receipt),
            Err(e) => error_response(&e),
        }
    }

    /// Serve a stored image, honouring conditional request headers
    pub async fn download(
        &self,
        id: &str,
        headers: &HeaderMap,
    ) -> Result<Response<Bytes>, ServiceError> {
        let image = self.store.get(id).await?;
        let cache_control = ResourceClass::Image.cache_control(&self.cache_control);
        Ok(respond(&image, &cache_control, headers))
    }

    /// `download` rendered as an HTTP response
    pub async fn handle_download(&self, id: &str, headers: &HeaderMap) -> Response<Bytes> {
        match self.download(id, headers).await {
            Ok(response) => response,
            Err(e) => error_response(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{ImageStore, MemoryImageStore, StoreError, StoredImage};
    use async_trait::async_trait;
    use http::HeaderValue;
    use mockall::mock;

    mock! {
        pub Store {}

        #[async_trait]
        impl ImageStore for Store {
            async fn put(&self, id: &str, compressed: Bytes, content_type: &str) -> Result<(), StoreError>;
            async fn get(&self, id: &str) -> Result<StoredImage, StoreError>;
        }
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn service() -> UploadService {
        UploadService::from_config(&Config::default(), Arc::new(MemoryImageStore::new()))
    }

    fn headers(content_type: &str, length: Option<usize>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        if let Some(length) = length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }
        headers
    }

    #[tokio::test]
    async fn test_missing_length_is_411() {
        let err = service()
            .upload(&headers("image/png", None), Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert_eq!(err.to_http_status(), 411);
    }

    #[tokio::test]
    async fn test_body_larger_than_limit_is_rejected_even_if_declared_small() {
        let mut config = Config::default();
        config.uploads.max_bytes = 16;
        let service = UploadService::from_config(&config, Arc::new(MemoryImageStore::new()));

        let err = service
            .upload(&headers("image/png", Some(4)), Bytes::from(vec![0u8; 64]))
            .await
            .unwrap_err();
        assert_eq!(err.to_http_status(), 413);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_500() {
        let body = Bytes::from_static(b"definitely not a png");
        let err = service()
            .upload(&headers("image/png", Some(body.len())), body)
            .await
            .unwrap_err();
        assert_eq!(err.to_http_status(), 500);
    }

    #[tokio::test]
    async fn test_unknown_download_is_404() {
        let response = service().handle_download("missing", &HeaderMap::new()).await;
        assert_eq!(response.status(), 404);

        let err = service()
            .download("missing", &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_store_receives_gzip_png() {
        let mut store = MockStore::new();
        store
            .expect_put()
            .withf(|id, compressed, content_type| {
                uuid::Uuid::parse_str(id).is_ok()
                    && compressed.starts_with(&[0x1f, 0x8b])
                    && content_type == "image/png"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let service = UploadService::from_config(&Config::default(), Arc::new(store));

        let body = tiny_png();
        let receipt = service
            .upload(&headers("image/png", Some(body.len())), Bytes::from(body))
            .await
            .unwrap();
        assert!(uuid::Uuid::parse_str(&receipt.id).is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let mut store = MockStore::new();
        store
            .expect_put()
            .returning(|_, _, _| Err(StoreError::Backend("disk full".to_string())));
        let service = UploadService::from_config(&Config::default(), Arc::new(store));

        let body = tiny_png();
        let response = service
            .handle_upload(&headers("image/png", Some(body.len())), Bytes::from(body))
            .await;
        assert_eq!(response.status(), 500);
        assert!(!String::from_utf8_lossy(response.body()).contains("disk full"));
    }

    #[test]
    fn test_receipt_serializes_as_file_name() {
        let json = serde_json::to_string(&UploadReceipt {
            id: "abc".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"fileName":"abc"}"#);
    }
}
