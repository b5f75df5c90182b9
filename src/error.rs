// Error types module

use crate::cache::AssetError;
use crate::compression::CompressionError;
use crate::transcode::TranscodeError;
use crate::upload::{AdmissionError, StoreError};

/// Generic 400 message
pub const PUBLIC_BAD_REQUEST: &str = "Something Went Wrong With your Request";
/// Generic 404 message
pub const PUBLIC_NOT_FOUND: &str = "Nothing was Found";
/// Generic 500 message
pub const PUBLIC_INTERNAL: &str = "Something Went Wrong";

/// Request-boundary error for the delivery and upload services
///
/// Every variant maps to an HTTP status and a client-safe message. The
/// `Display` text carries internal detail for logs only.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Admission(#[from] AdmissionError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Compression(#[from] CompressionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// No resident entry under this name
    #[error("Unknown resident resource '{0}'")]
    UnknownResident(String),

    /// Unexpected internal failure (worker panics, join errors)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn to_http_status(&self) -> u16 {
        match self {
            ServiceError::Asset(e) => e.to_http_status(),
            ServiceError::Admission(e) => e.to_http_status(),
            ServiceError::Transcode(e) => e.to_http_status(),
            ServiceError::Compression(e) => e.to_http_status(),
            ServiceError::Store(e) => e.to_http_status(),
            ServiceError::UnknownResident(_) => 404,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            ServiceError::Asset(e) => e.public_message(),
            ServiceError::Admission(e) => e.public_message(),
            ServiceError::Transcode(TranscodeError::UnsupportedFormat { .. }) => {
                AdmissionError::UNSUPPORTED_FORMAT_MESSAGE
            }
            ServiceError::Store(StoreError::NotFound { .. }) | ServiceError::UnknownResident(_) => {
                PUBLIC_NOT_FOUND
            }
            ServiceError::Transcode(_)
            | ServiceError::Compression(_)
            | ServiceError::Store(_)
            | ServiceError::Internal(_) => PUBLIC_INTERNAL,
        }
    }
}

/// Failure that prevents the process from accepting traffic
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load resident resource '{name}' from {path}: {message}")]
    ResidentLoad {
        name: String,
        path: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_errors_keep_their_status() {
        let err = ServiceError::from(AssetError::invalid_name("../x"));
        assert_eq!(err.to_http_status(), 400);
        assert_eq!(err.public_message(), PUBLIC_BAD_REQUEST);
    }

    #[test]
    fn test_admission_errors_map_to_4xx() {
        assert_eq!(
            ServiceError::from(AdmissionError::LengthRequired).to_http_status(),
            411
        );
        assert_eq!(
            ServiceError::from(AdmissionError::TooLarge {
                length: 6_000_000,
                limit: 5_000_000
            })
            .to_http_status(),
            413
        );
    }

    #[test]
    fn test_transcode_failure_is_internal_and_opaque() {
        let err = ServiceError::from(TranscodeError::decode_failure("PNG", "bad IHDR chunk"));
        assert_eq!(err.to_http_status(), 500);
        assert_eq!(err.public_message(), PUBLIC_INTERNAL);
        assert!(err.to_string().contains("IHDR"));
    }

    #[test]
    fn test_missing_image_is_404() {
        let err = ServiceError::from(StoreError::not_found("abc"));
        assert_eq!(err.to_http_status(), 404);
        assert_eq!(err.public_message(), PUBLIC_NOT_FOUND);
    }

    #[test]
    fn test_startup_error_display_names_resource() {
        let err = StartupError::ResidentLoad {
            name: "index.html".to_string(),
            path: "dist/index.html".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert!(err.to_string().contains("index.html"));
    }
}
