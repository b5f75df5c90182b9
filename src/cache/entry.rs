//! Cache entry type
//!
//! A `CacheEntry` holds one gzip-compressed resource together with the
//! metadata the conditional-request evaluator needs.

use bytes::Bytes;
use std::path::Path;
use std::time::SystemTime;

use super::error::AssetError;
use crate::compression::compress;
use crate::content_type;
use crate::fingerprint::fingerprint;

/// One cached resource
///
/// Immutable once built; shared between readers as `Arc<CacheEntry>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// File name or logical name the entry is stored under
    pub key: String,
    /// Gzip stream of the source bytes
    pub compressed: Bytes,
    /// Resolved content type
    pub content_type: String,
    /// Quoted fingerprint of the uncompressed source bytes
    pub etag: String,
    /// Modification time of the source
    pub last_modified: SystemTime,
}

impl CacheEntry {
    /// Build an entry, resolving the content type from `raw` and the key's extension
    pub fn build(
        key: impl Into<String>,
        raw: &[u8],
        last_modified: SystemTime,
    ) -> Result<Self, AssetError> {
        let key = key.into();
        let content_type = content_type::resolve(raw, Path::new(&key));
        Self::with_content_type(key, raw, last_modified, content_type)
    }

    /// Build an entry with an explicitly declared content type
    pub fn with_content_type(
        key: impl Into<String>,
        raw: &[u8],
        last_modified: SystemTime,
        content_type: impl Into<String>,
    ) -> Result<Self, AssetError> {
        let key = key.into();
        let compressed = compress(raw).map_err(|e| AssetError::from_compression(&key, e))?;
        Ok(Self {
            etag: fingerprint(raw),
            compressed: Bytes::from(compressed),
            content_type: content_type.into(),
            last_modified,
            key,
        })
    }

    /// Approximate heap footprint, used as the eviction weight
    pub fn size_bytes(&self) -> usize {
        self.compressed.len() + self.key.len() + self.content_type.len() + self.etag.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::decompress;
    use std::time::Duration;

    #[test]
    fn test_build_compresses_and_fingerprints_source() {
        let raw = b"console.log('hi');";
        let entry = CacheEntry::build("app.js", raw, SystemTime::UNIX_EPOCH).unwrap();

        assert_eq!(entry.key, "app.js");
        assert_eq!(entry.content_type, "text/javascript");
        assert_eq!(entry.etag, fingerprint(raw));
        assert_eq!(decompress(&entry.compressed).unwrap(), raw.to_vec());
    }

    #[test]
    fn test_etag_ignores_build_time() {
        let raw = b"body { color: red; }";
        let first = CacheEntry::build("a.css", raw, SystemTime::UNIX_EPOCH).unwrap();
        let second = CacheEntry::build(
            "a.css",
            raw,
            SystemTime::UNIX_EPOCH + Duration::from_secs(3600),
        )
        .unwrap();
        assert_eq!(first.etag, second.etag);
        assert_eq!(first.compressed, second.compressed);
    }

    #[test]
    fn test_explicit_content_type_wins() {
        let entry = CacheEntry::with_content_type(
            "index.html",
            b"{}",
            SystemTime::UNIX_EPOCH,
            "text/html",
        )
        .unwrap();
        assert_eq!(entry.content_type, "text/html");
    }

    #[test]
    fn test_size_bytes_counts_compressed_payload() {
        let entry = CacheEntry::build("a.txt", b"hello", SystemTime::UNIX_EPOCH).unwrap();
        assert!(entry.size_bytes() >= entry.compressed.len());
    }
}
