//! `Cache-Control` values per resource class.

use crate::config::CacheControlConfig;

/// Kind of resource being served; decides the `Cache-Control` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    /// Per-file assets from the asset root
    Asset,
    /// HTML shell and manifest
    Resident,
    /// Downloaded user images
    Image,
}

impl ResourceClass {
    /// Returns the `max-age` configured for this class, in seconds
    pub fn max_age_secs(self, config: &CacheControlConfig) -> u64 {
        match self {
            ResourceClass::Asset => config.asset_max_age_secs,
            ResourceClass::Resident => config.resident_max_age_secs,
            ResourceClass::Image => config.image_max_age_secs,
        }
    }

    /// Renders the `Cache-Control` header value
    pub fn cache_control(self, config: &CacheControlConfig) -> String {
        let max_age = self.max_age_secs(config);
        match self {
            ResourceClass::Resident => format!("must-revalidate, public, max-age={}", max_age),
            ResourceClass::Asset | ResourceClass::Image => {
                format!("must-revalidate, max-age={}", max_age)
            }
        }
    }
}
