//! Lazily populated asset cache
//!
//! Entries are built on first request and kept for the life of the cache.
//! Population goes through moka's `try_get_with`, so concurrent misses on the
//! same key share one source read and one compression, and readers only ever
//! see fully built entries. Different keys never wait on each other.

use std::sync::Arc;

use super::entry::CacheEntry;
use super::error::AssetError;
use super::is_safe_name;
use super::source::{AssetSource, FileSystemSource};
use super::stats::{CacheStats, StatsTracker};
use crate::config::AssetsConfig;

/// Cache of compressed assets keyed by file name
pub struct AssetCache {
    entries: moka::future::Cache<String, Arc<CacheEntry>>,
    source: Arc<dyn AssetSource>,
    stats: Arc<StatsTracker>,
}

impl AssetCache {
    /// Create an unbounded cache; entries are never evicted
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            entries: moka::future::Cache::builder().build(),
            source,
            stats: Arc::new(StatsTracker::default()),
        }
    }

    /// Create a cache that evicts once the summed entry size exceeds `max_bytes`
    pub fn with_max_capacity(source: Arc<dyn AssetSource>, max_bytes: u64) -> Self {
        let entries = moka::future::Cache::builder()
            .max_capacity(max_bytes)
            .weigher(|_key, entry: &Arc<CacheEntry>| {
                u32::try_from(entry.size_bytes()).unwrap_or(u32::MAX)
            })
            .build();

        Self {
            entries,
            source,
            stats: Arc::new(StatsTracker::default()),
        }
    }

    /// Create a file system backed cache from configuration
    pub fn from_config(config: &AssetsConfig) -> Self {
        let source: Arc<dyn AssetSource> = Arc::new(FileSystemSource::new(&config.root));
        match config.max_capacity_bytes {
            Some(max_bytes) => Self::with_max_capacity(source, max_bytes),
            None => Self::new(source),
        }
    }

    /// Get the entry for `name`, building it on first request
    ///
    /// Unsafe names fail with `InvalidName` before the source is touched.
    pub async fn get(&self, name: &str) -> Result<Arc<CacheEntry>, AssetError> {
        if !is_safe_name(name) {
            tracing::debug!(name = %name, "Rejected unsafe asset name");
            return Err(AssetError::invalid_name(name));
        }

        if let Some(entry) = self.entries.get(name).await {
            self.stats.increment_hits();
            return Ok(entry);
        }
        self.stats.increment_misses();

        let source = Arc::clone(&self.source);
        let stats = Arc::clone(&self.stats);
        let key = name.to_string();
        let build = async move {
            tracing::debug!(name = %key, "Building asset cache entry");
            let file = source.read(&key).await?;
            let entry = CacheEntry::build(key.as_str(), &file.bytes, file.modified)?;
            stats.increment_builds();
            tracing::debug!(
                name = %key,
                content_type = %entry.content_type,
                original_bytes = file.bytes.len(),
                compressed_bytes = entry.compressed.len(),
                "Asset cache entry built"
            );
            Ok::<_, AssetError>(Arc::new(entry))
        };

        self.entries
            .try_get_with(name.to_string(), build)
            .await
            .map_err(|e| {
                tracing::warn!(name = %name, error = %e, "Asset cache build failed");
                (*e).clone()
            })
    }

    /// Returns true if an entry for `name` is currently held
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Snapshot of hit/miss/build counters and the current entry count
    pub async fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks().await;
        self.stats.snapshot(self.entries.entry_count())
    }
}
