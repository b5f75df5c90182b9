//! Asset delivery facade

use bytes::Bytes;
use http::{HeaderMap, Response};

use super::response::{error_response, respond};
use crate::cache::{AssetCache, CacheStats, ResidentAssets, ResourceClass};
use crate::config::{CacheControlConfig, Config};
use crate::error::{ServiceError, StartupError};

/// Serves per-file assets and resident resources
pub struct AssetService {
    cache: AssetCache,
    resident: ResidentAssets,
    cache_control: CacheControlConfig,
}

impl AssetService {
    pub fn new(
        cache: AssetCache,
        resident: ResidentAssets,
        cache_control: CacheControlConfig,
    ) -> Self {
        Self {
            cache,
            resident,
            cache_control,
        }
    }

    /// Pre-warm resident resources and set up the lazy asset cache
    ///
    /// Fails if any resident resource cannot be loaded; the caller should not
    /// start serving in that case.
    pub fn start(config: &Config) -> Result<Self, StartupError> {
        let resident = ResidentAssets::load(&config.resident).map_err(|e| {
            tracing::error!(error = %e, "Resident resource load failed");
            e
        })?;
        let cache = AssetCache::from_config(&config.assets);

        tracing::info!(
            assets_root = %config.assets.root.display(),
            max_capacity_bytes = ?config.assets.max_capacity_bytes,
            resident = resident.len(),
            "Asset service started"
        );
        Ok(Self::new(cache, resident, config.cache_control.clone()))
    }

    /// Serve a per-file asset from the lazy cache
    pub async fn serve_asset(&self, name: &str, headers: &HeaderMap) -> Response<Bytes> {
        match self.cache.get(name).await {
            Ok(entry) => respond(
                &*entry,
                &ResourceClass::Asset.cache_control(&self.cache_control),
                headers,
            ),
            Err(e) => error_response(&ServiceError::from(e)),
        }
    }

    /// Serve a resident resource (HTML shell, manifest)
    pub fn serve_resident(&self, name: &str, headers: &HeaderMap) -> Response<Bytes> {
        match self.resident.get(name) {
            Some(entry) => respond(
                &*entry,
                &ResourceClass::Resident.cache_control(&self.cache_control),
                headers,
            ),
            None => error_response(&ServiceError::UnknownResident(name.to_string())),
        }
    }

    pub fn cache(&self) -> &AssetCache {
        &self.cache
    }

    pub fn resident(&self) -> &ResidentAssets {
        &self.resident
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
