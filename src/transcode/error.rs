//! Image transcoding error types
//!
//! Structured errors with HTTP status mapping, consistent with the
//! compression module pattern.

use thiserror::Error;

/// Errors that can occur while re-encoding an uploaded image
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranscodeError {
    /// Declared mimetype is not one of PNG, JPEG or GIF
    #[error("Unsupported image format: {format}")]
    UnsupportedFormat { format: String },
    /// The body could not be decoded as the declared format
    #[error("Failed to decode {format}: {message}")]
    DecodeFailure { format: &'static str, message: String },
    /// Re-encoding the decoded image failed
    #[error("Failed to encode {format}: {message}")]
    EncodeFailure { format: &'static str, message: String },
}

impl TranscodeError {
    /// Maps transcoding errors to HTTP status codes
    ///
    /// Status mapping:
    /// - UnsupportedFormat → 415 (Unsupported Media Type)
    /// - DecodeFailure, EncodeFailure → 500 (Internal Server Error)
    pub fn to_http_status(&self) -> u16 {
        match self {
            TranscodeError::UnsupportedFormat { .. } => 415,
            TranscodeError::DecodeFailure { .. } | TranscodeError::EncodeFailure { .. } => 500,
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        TranscodeError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failure(format: &'static str, message: impl ToString) -> Self {
        TranscodeError::DecodeFailure {
            format,
            message: message.to_string(),
        }
    }

    pub fn encode_failure(format: &'static str, message: impl ToString) -> Self {
        TranscodeError::EncodeFailure {
            format,
            message: message.to_string(),
        }
    }
}
