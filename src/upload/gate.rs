//! Pre-transcode admission checks on declared upload metadata.

use crate::config::UploadConfig;
use crate::transcode::ImageKind;

/// Why an upload was turned away
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    /// `Content-Length` absent or not a non-negative integer
    #[error("Content-Length header missing or invalid")]
    LengthRequired,

    /// Declared type is not PNG, JPEG or GIF
    #[error("Unsupported upload content type '{content_type}'")]
    UnsupportedFormat { content_type: String },

    /// Declared (or actual) length at or above the ceiling
    #[error("Upload of {length} bytes exceeds the {limit} byte limit")]
    TooLarge { length: u64, limit: u64 },
}

impl AdmissionError {
    pub const UNSUPPORTED_FORMAT_MESSAGE: &'static str = "Format not Supported (PNG, JPEG, GIF)";

    pub fn to_http_status(&self) -> u16 {
        match self {
            AdmissionError::LengthRequired => 411,
            AdmissionError::UnsupportedFormat { .. } => 415,
            AdmissionError::TooLarge { .. } => 413,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            AdmissionError::LengthRequired => "Length Required",
            AdmissionError::UnsupportedFormat { .. } => Self::UNSUPPORTED_FORMAT_MESSAGE,
            AdmissionError::TooLarge { .. } => "Image too Big",
        }
    }
}

/// Outcome of `UploadGate::admit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(ImageKind),
    Rejected(AdmissionError),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn into_result(self) -> Result<ImageKind, AdmissionError> {
        match self {
            Verdict::Accepted(kind) => Ok(kind),
            Verdict::Rejected(err) => Err(err),
        }
    }
}

/// Parse a raw `Content-Length` header value
///
/// Returns `None` for anything that is not a plain non-negative integer.
pub fn parse_content_length(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Checks declared upload metadata before the body is transcoded
#[derive(Debug, Clone, Copy)]
pub struct UploadGate {
    max_bytes: u64,
}

impl Default for UploadGate {
    fn default() -> Self {
        Self::from_config(&UploadConfig::default())
    }
}

impl UploadGate {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_bytes)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Decide whether an upload may proceed
    ///
    /// Checks run in order: length present, format supported, size below the
    /// ceiling. The first failing check decides the verdict.
    pub fn admit(&self, declared_content_type: &str, declared_length: Option<u64>) -> Verdict {
        let Some(length) = declared_length else {
            return Verdict::Rejected(AdmissionError::LengthRequired);
        };

        let kind = match ImageKind::from_mime(declared_content_type) {
            Ok(kind) => kind,
            Err(_) => {
                return Verdict::Rejected(AdmissionError::UnsupportedFormat {
                    content_type: declared_content_type.to_string(),
                })
            }
        };

        if let Err(err) = self.check_size(length) {
            return Verdict::Rejected(err);
        }

        Verdict::Accepted(kind)
    }

    /// Enforce the ceiling on a length, declared or actual
    pub fn check_size(&self, length: u64) -> Result<(), AdmissionError> {
        if length >= self.max_bytes {
            return Err(AdmissionError::TooLarge {
                length,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}
