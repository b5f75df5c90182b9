//! Backing byte store for the asset cache

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::SystemTime;

use super::error::AssetError;

/// Raw bytes of a resource plus its modification time
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub bytes: Vec<u8>,
    pub modified: SystemTime,
}

/// Read-by-name access to the resources the cache is built from
///
/// Callers pass names that already passed `is_safe_name`.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn read(&self, name: &str) -> Result<SourceFile, AssetError>;
}

/// Reads assets from a directory on the local file system
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl AssetSource for FileSystemSource {
    async fn read(&self, name: &str) -> Result<SourceFile, AssetError> {
        let path = self.root.join(name);

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::not_found(name),
            _ => AssetError::read_failure(name, e),
        })?;
        if !metadata.is_file() {
            return Err(AssetError::not_found(name));
        }

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::not_found(name),
            _ => AssetError::read_failure(name, e),
        })?;
        // Some file systems do not record mtime
        let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());

        Ok(SourceFile { bytes, modified })
    }
}
