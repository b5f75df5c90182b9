//! Asset cache error types

use crate::compression::CompressionError;

/// Errors surfaced by `AssetCache::get`
///
/// `Clone` because a failed build is shared with every caller that was
/// waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetError {
    /// Name contains a path separator or `..`
    #[error("Invalid asset name '{name}'")]
    InvalidName { name: String },

    /// No such file under the asset root
    #[error("Asset '{name}' not found")]
    NotFound { name: String },

    /// The file exists but could not be read
    #[error("Failed to read asset '{name}': {message}")]
    ReadFailure { name: String, message: String },

    /// The payload could not be gzip-compressed
    #[error("Failed to compress asset '{name}': {message}")]
    CompressFailure { name: String, message: String },
}

impl AssetError {
    pub fn invalid_name(name: impl Into<String>) -> Self {
        AssetError::InvalidName { name: name.into() }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        AssetError::NotFound { name: name.into() }
    }

    pub fn read_failure(name: impl Into<String>, err: impl ToString) -> Self {
        AssetError::ReadFailure {
            name: name.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn from_compression(name: impl Into<String>, err: CompressionError) -> Self {
        AssetError::CompressFailure {
            name: name.into(),
            message: err.to_string(),
        }
    }

    /// Get HTTP status code for this error
    pub fn to_http_status(&self) -> u16 {
        match self {
            AssetError::InvalidName { .. } => 400,
            AssetError::NotFound { .. } => 404,
            AssetError::ReadFailure { .. } | AssetError::CompressFailure { .. } => 500,
        }
    }

    /// Client-safe message; never includes file system details
    pub fn public_message(&self) -> &'static str {
        match self {
            AssetError::InvalidName { .. } => crate::error::PUBLIC_BAD_REQUEST,
            AssetError::NotFound { .. } => "File doesn't exist",
            AssetError::ReadFailure { .. } | AssetError::CompressFailure { .. } => {
                "Couldn't get file"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AssetError::invalid_name("../x").to_http_status(), 400);
        assert_eq!(AssetError::not_found("x").to_http_status(), 404);
        assert_eq!(AssetError::read_failure("x", "EIO").to_http_status(), 500);
        let err = AssetError::from_compression("x", CompressionError::CompressionFailed("boom".into()));
        assert_eq!(err.to_http_status(), 500);
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = AssetError::read_failure("app.js", "permission denied (os error 13)");
        assert!(err.to_string().contains("permission denied"));
        assert!(!err.public_message().contains("permission"));
    }
}
