//! Always-resident entries
//!
//! The HTML shell and manifest are read once at startup and never rebuilt.
//! A load failure here is fatal: the process must not accept traffic
//! without them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use super::entry::CacheEntry;
use crate::config::ResidentConfig;
use crate::error::StartupError;

/// Immutable map of pre-warmed entries
#[derive(Debug, Default)]
pub struct ResidentAssets {
    entries: HashMap<String, Arc<CacheEntry>>,
}

impl ResidentAssets {
    /// Read, compress and fingerprint every configured resident resource
    pub fn load(resident: &[ResidentConfig]) -> Result<Self, StartupError> {
        let mut entries = HashMap::with_capacity(resident.len());

        for item in resident {
            let load_error = |message: String| StartupError::ResidentLoad {
                name: item.name.clone(),
                path: item.path.display().to_string(),
                message,
            };

            let raw = std::fs::read(&item.path).map_err(|e| load_error(e.to_string()))?;
            let modified = std::fs::metadata(&item.path)
                .and_then(|m| m.modified())
                .unwrap_or_else(|_| SystemTime::now());
            let entry = CacheEntry::with_content_type(
                item.name.as_str(),
                &raw,
                modified,
                item.content_type.as_str(),
            )
            .map_err(|e| load_error(e.to_string()))?;

            tracing::info!(
                name = %item.name,
                path = %item.path.display(),
                content_type = %entry.content_type,
                etag = %entry.etag,
                bytes = raw.len(),
                "Resident resource loaded"
            );
            entries.insert(item.name.clone(), Arc::new(entry));
        }

        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<Arc<CacheEntry>> {
        self.entries.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
