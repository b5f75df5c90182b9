// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the config defaults, the
// upload gate and the cache-control headers in agreement.

// =============================================================================
// Asset defaults
// =============================================================================

/// Default directory that per-file assets are served from
pub const DEFAULT_ASSETS_ROOT: &str = "dist/assets";

/// Default HTML shell served for every client-side route
pub const DEFAULT_HTML_SHELL_PATH: &str = "dist/index.html";

/// Default web app manifest
pub const DEFAULT_MANIFEST_PATH: &str = "manifest.json";

// =============================================================================
// Upload defaults
// =============================================================================

/// Uploads declaring this many bytes or more are rejected (5 MB)
pub const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5_000_000;

/// GIF frames with more palette entries than this are reduced
pub const DEFAULT_GIF_PALETTE_SIZE: usize = 25;

/// JPEG re-encode quality
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

// =============================================================================
// Cache-Control defaults
// =============================================================================

/// Generic assets: one day
pub const DEFAULT_ASSET_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// HTML shell and manifest: one week
pub const DEFAULT_RESIDENT_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// Downloaded images: two weeks
pub const DEFAULT_IMAGE_MAX_AGE_SECS: u64 = 14 * 24 * 60 * 60;

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";
