//! Asset cache module
//!
//! This module provides the content delivery cache:
//! - `AssetCache`: lazily populated, gzip-compressed asset entries with
//!   at-most-one concurrent build per key
//! - `ResidentAssets`: always-resident entries (HTML shell, manifest) loaded
//!   once at startup
//! - `ResourceClass`: per-class `Cache-Control` header values
//!
//! # Example
//!
//! ```rust,no_run
//! use brewcache::cache::{AssetCache, FileSystemSource};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), brewcache::cache::AssetError> {
//! let cache = AssetCache::new(Arc::new(FileSystemSource::new("dist/assets")));
//! let entry = cache.get("app.js").await?;
//! assert_eq!(entry.content_type, "text/javascript");
//! # Ok(())
//! # }
//! ```

mod asset_cache;
mod control;
mod entry;
mod error;
mod resident;
mod source;
mod stats;

pub use asset_cache::AssetCache;
pub use control::ResourceClass;
pub use entry::CacheEntry;
pub use error::AssetError;
pub use resident::ResidentAssets;
pub use source::{AssetSource, FileSystemSource, SourceFile};
pub use stats::CacheStats;

/// Returns true if `name` is a plain file name that cannot escape the asset root.
///
/// Names containing `/`, `\` or `..` are rejected, as is the empty name.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}
