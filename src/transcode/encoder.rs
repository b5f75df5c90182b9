//! Still-image re-encoders
//!
//! JPEG and PNG uploads are decoded with the `image` crate and written back
//! out with standard settings, which strips metadata and normalises encoder
//! choices made by whatever produced the upload.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat};

use super::error::TranscodeError;

/// Decode `data`, which must be in `format`
fn decode(
    data: &[u8],
    format: ImageFormat,
    name: &'static str,
) -> Result<DynamicImage, TranscodeError> {
    image::load_from_memory_with_format(data, format)
        .map_err(|e| TranscodeError::decode_failure(name, e))
}

/// Re-encode a JPEG at `quality` (1-100)
pub fn transcode_jpeg(data: &[u8], quality: u8) -> Result<Vec<u8>, TranscodeError> {
    let img = decode(data, ImageFormat::Jpeg, "jpeg")?;
    let (width, height) = (img.width(), img.height());

    // JPEG has no alpha channel; grayscale stays grayscale.
    let (pixels, color) = match img {
        DynamicImage::ImageLuma8(gray) => (gray.into_raw(), ColorType::L8),
        other => (other.to_rgb8().into_raw(), ColorType::Rgb8),
    };

    let mut output = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100))
        .write_image(&pixels, width, height, color)
        .map_err(|e| TranscodeError::encode_failure("jpeg", e))?;

    Ok(output.into_inner())
}

/// Re-encode a PNG with default compression and adaptive filtering
///
/// The decoded color type is written back unchanged, so the lossless path
/// reproduces every pixel exactly.
pub fn transcode_png(data: &[u8]) -> Result<Vec<u8>, TranscodeError> {
    let img = decode(data, ImageFormat::Png, "png")?;

    // The PNG encoder takes 8/16-bit gray, gray-alpha, RGB and RGBA only.
    let img = match img.color() {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16 => img,
        _ => DynamicImage::ImageRgba8(img.to_rgba8()),
    };

    let mut output = Cursor::new(Vec::new());
    PngEncoder::new_with_quality(&mut output, CompressionType::Default, FilterType::Adaptive)
        .write_image(img.as_bytes(), img.width(), img.height(), img.color())
        .map_err(|e| TranscodeError::encode_failure("png", e))?;

    Ok(output.into_inner())
}
