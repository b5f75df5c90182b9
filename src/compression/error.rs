/// Compression error types
use thiserror::Error;

/// Errors that can occur during gzip encode/decode
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompressionError {
    /// Writing into the gzip encoder failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),
    /// Input was not a well-formed gzip stream
    #[error("Corrupt gzip stream: {0}")]
    CorruptStream(String),
}

impl CompressionError {
    /// Maps compression errors to HTTP status codes
    ///
    /// Status mapping:
    /// - CompressionFailed → 500 (Internal Server Error)
    /// - CorruptStream → 500
    pub fn to_http_status(&self) -> u16 {
        500
    }
}
