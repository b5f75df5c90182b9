// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::cache::is_safe_name;
use crate::constants::{
    DEFAULT_ASSETS_ROOT, DEFAULT_ASSET_MAX_AGE_SECS, DEFAULT_GIF_PALETTE_SIZE,
    DEFAULT_HTML_SHELL_PATH, DEFAULT_IMAGE_MAX_AGE_SECS, DEFAULT_JPEG_QUALITY, DEFAULT_LOG_LEVEL,
    DEFAULT_MANIFEST_PATH, DEFAULT_RESIDENT_MAX_AGE_SECS, DEFAULT_UPLOAD_MAX_BYTES,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default = "default_resident")]
    pub resident: Vec<ResidentConfig>,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub cache_control: CacheControlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets: AssetsConfig::default(),
            resident: default_resident(),
            uploads: UploadConfig::default(),
            cache_control: CacheControlConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Lazily cached per-file assets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Directory asset names are resolved against
    #[serde(default = "default_assets_root")]
    pub root: PathBuf,
    /// Upper bound on the summed compressed size of cached assets.
    /// Absent means entries are never evicted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity_bytes: Option<u64>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_assets_root(),
            max_capacity_bytes: None,
        }
    }
}

fn default_assets_root() -> PathBuf {
    PathBuf::from(DEFAULT_ASSETS_ROOT)
}

/// An always-resident resource loaded at startup (HTML shell, manifest)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResidentConfig {
    /// Logical name the resource is served under
    pub name: String,
    /// File the bytes are read from
    pub path: PathBuf,
    /// Content type sent with the resource
    pub content_type: String,
}

fn default_resident() -> Vec<ResidentConfig> {
    vec![
        ResidentConfig {
            name: "index.html".to_string(),
            path: PathBuf::from(DEFAULT_HTML_SHELL_PATH),
            content_type: "text/html".to_string(),
        },
        ResidentConfig {
            name: "manifest.json".to_string(),
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            content_type: "application/json".to_string(),
        },
    ]
}

/// Image upload limits and transcoder settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadConfig {
    /// Declared (and actual) body sizes at or above this are rejected
    #[serde(default = "default_upload_max_bytes")]
    pub max_bytes: u64,
    /// GIF palette target size
    #[serde(default = "default_gif_palette_size")]
    pub gif_palette_size: usize,
    /// JPEG re-encode quality
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_upload_max_bytes(),
            gif_palette_size: default_gif_palette_size(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_upload_max_bytes() -> u64 {
    DEFAULT_UPLOAD_MAX_BYTES
}

fn default_gif_palette_size() -> usize {
    DEFAULT_GIF_PALETTE_SIZE
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

/// `max-age` values per resource class, in seconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheControlConfig {
    #[serde(default = "default_asset_max_age")]
    pub asset_max_age_secs: u64,
    #[serde(default = "default_resident_max_age")]
    pub resident_max_age_secs: u64,
    #[serde(default = "default_image_max_age")]
    pub image_max_age_secs: u64,
}

impl Default for CacheControlConfig {
    fn default() -> Self {
        Self {
            asset_max_age_secs: default_asset_max_age(),
            resident_max_age_secs: default_resident_max_age(),
            image_max_age_secs: default_image_max_age(),
        }
    }
}

fn default_asset_max_age() -> u64 {
    DEFAULT_ASSET_MAX_AGE_SECS
}

fn default_resident_max_age() -> u64 {
    DEFAULT_RESIDENT_MAX_AGE_SECS
}

fn default_image_max_age() -> u64 {
    DEFAULT_IMAGE_MAX_AGE_SECS
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event (default)
    #[default]
    Json,
    /// Human-readable multi-field lines
    Pretty,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        let mut missing = Vec::new();
        for caps in re.captures_iter(yaml) {
            if std::env::var(&caps[1]).is_err() {
                missing.push(caps[1].to_string());
            }
        }
        if let Some(var_name) = missing.first() {
            return Err(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            ));
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        let config: Config = serde_yaml::from_str(&substituted)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.assets.root.as_os_str().is_empty() {
            return Err("assets.root cannot be empty".to_string());
        }
        if self.assets.max_capacity_bytes == Some(0) {
            return Err("assets.max_capacity_bytes must be greater than 0 when set".to_string());
        }

        let mut seen_names = HashSet::new();
        for resident in &self.resident {
            if !is_safe_name(&resident.name) {
                return Err(format!(
                    "Resident name '{}' must be a plain file name",
                    resident.name
                ));
            }
            if !seen_names.insert(resident.name.as_str()) {
                return Err(format!("Duplicate resident name '{}'", resident.name));
            }
            if resident.content_type.trim().is_empty() {
                return Err(format!(
                    "Resident '{}' has an empty content_type",
                    resident.name
                ));
            }
        }

        if self.uploads.max_bytes == 0 {
            return Err("uploads.max_bytes must be greater than 0".to_string());
        }
        if !(2..=256).contains(&self.uploads.gif_palette_size) {
            return Err(format!(
                "uploads.gif_palette_size must be 2-256, got {}",
                self.uploads.gif_palette_size
            ));
        }
        if !(1..=100).contains(&self.uploads.jpeg_quality) {
            return Err(format!(
                "uploads.jpeg_quality must be 1-100, got {}",
                self.uploads.jpeg_quality
            ));
        }

        let cc = &self.cache_control;
        if cc.asset_max_age_secs == 0 || cc.resident_max_age_secs == 0 || cc.image_max_age_secs == 0
        {
            return Err("cache_control max-age values must be greater than 0".to_string());
        }

        Ok(())
    }
}
