// Brewcache: content delivery cache and image transcoding pipeline

pub mod cache;
pub mod compression;
pub mod config;
pub mod constants;
pub mod content_type;
pub mod delivery;
pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod transcode;
pub mod upload;
