//! Upload image transcoding
//!
//! Re-encodes uploaded images into a compact representation before they are
//! persisted:
//! - JPEG: decode and re-encode at the default quality
//! - PNG: decode and re-encode losslessly at the default compression level
//! - GIF: decode every frame, reduce oversized palettes with Floyd–Steinberg
//!   dithering, re-encode as a single animation
//!
//! Dispatch is on the *declared* type ([`ImageKind`]); a body that does not
//! decode as its declared type is a [`TranscodeError::DecodeFailure`].

pub mod animation;
pub mod encoder;
pub mod error;
pub mod format;
pub mod palette;

use std::time::Instant;

pub use animation::{transcode_gif, Animation};
pub use encoder::{transcode_jpeg, transcode_png};
pub use error::TranscodeError;
pub use format::ImageKind;
pub use palette::PaletteImage;

use crate::config::UploadConfig;
use crate::constants::{DEFAULT_GIF_PALETTE_SIZE, DEFAULT_JPEG_QUALITY};

/// Format-dispatched image re-encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTranscoder {
    /// Maximum palette size for GIF frames
    pub gif_palette_size: usize,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self {
            gif_palette_size: DEFAULT_GIF_PALETTE_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageTranscoder {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            gif_palette_size: config.gif_palette_size,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// Transcode `data` declared as `mimetype`
    pub fn transcode(&self, mimetype: &str, data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let kind = ImageKind::from_mime(mimetype)?;
        self.transcode_kind(kind, data)
    }

    /// Transcode `data` already classified as `kind`
    pub fn transcode_kind(&self, kind: ImageKind, data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        let started = Instant::now();

        let output = match kind {
            ImageKind::Jpeg => transcode_jpeg(data, self.jpeg_quality),
            ImageKind::Png => transcode_png(data),
            ImageKind::Gif => transcode_gif(data, self.gif_palette_size),
        }?;

        tracing::debug!(
            format = kind.name(),
            input_bytes = data.len(),
            output_bytes = output.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image transcoded"
        );

        Ok(output)
    }
}
