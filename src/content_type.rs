//! Content type resolution for served assets
//!
//! Types are sniffed from leading magic bytes, then a small extension table
//! overrides the result for files generic sniffing gets wrong (scripts and
//! stylesheets both look like plain text).

use std::path::Path;

/// Extension overrides applied after sniffing
const EXTENSION_OVERRIDES: &[(&str, &str)] = &[("js", "text/javascript"), ("css", "text/css")];

/// Resolve the canonical content type for `bytes` stored at `path`
pub fn resolve(bytes: &[u8], path: impl AsRef<Path>) -> String {
    let sniffed = sniff(bytes);

    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    if let Some(extension) = extension {
        if let Some((_, overridden)) = EXTENSION_OVERRIDES
            .iter()
            .find(|(candidate, _)| *candidate == extension)
        {
            return (*overridden).to_string();
        }
    }

    sniffed
}

/// Detect a content type from the byte content alone
pub fn sniff(bytes: &[u8]) -> String {
    if let Some(binary) = sniff_binary(bytes) {
        return binary.to_string();
    }
    sniff_text(bytes)
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string())
}

fn sniff_binary(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        let image_type = match format {
            image::ImageFormat::Png => Some("image/png"),
            image::ImageFormat::Jpeg => Some("image/jpeg"),
            image::ImageFormat::Gif => Some("image/gif"),
            image::ImageFormat::Bmp => Some("image/bmp"),
            image::ImageFormat::WebP => Some("image/webp"),
            image::ImageFormat::Ico => Some("image/x-icon"),
            image::ImageFormat::Tiff => Some("image/tiff"),
            image::ImageFormat::Avif => Some("image/avif"),
            _ => None,
        };
        if image_type.is_some() {
            return image_type;
        }
    }

    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (b"\0asm", "application/wasm"),
        (b"wOFF", "font/woff"),
        (b"wOF2", "font/woff2"),
        (b"OTTO", "font/otf"),
        (&[0x00, 0x01, 0x00, 0x00], "font/ttf"),
        (&[0x1f, 0x8b], "application/gzip"),
        (b"PK\x03\x04", "application/zip"),
    ];

    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, content_type)| *content_type)
}

fn sniff_text(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)).ok()?;
    if text.contains('\0') {
        return None;
    }

    let head = text.trim_start();
    let lowered: String = head.chars().take(256).collect::<String>().to_ascii_lowercase();

    if lowered.starts_with("<!doctype html") || lowered.starts_with("<html") {
        return Some(mime::TEXT_HTML_UTF_8.to_string());
    }
    if lowered.starts_with("<svg") || (lowered.starts_with("<?xml") && lowered.contains("<svg")) {
        return Some(mime::IMAGE_SVG.to_string());
    }
    if lowered.starts_with("<?xml") {
        return Some("text/xml; charset=utf-8".to_string());
    }
    if (head.starts_with('{') || head.starts_with('['))
        && serde_json::from_str::<serde::de::IgnoredAny>(head).is_ok()
    {
        return Some(mime::APPLICATION_JSON.to_string());
    }

    Some(mime::TEXT_PLAIN_UTF_8.to_string())
}
