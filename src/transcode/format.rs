//! Supported upload formats
//!
//! Uploads are dispatched on the *declared* mimetype. Parsing it into
//! [`ImageKind`] at the boundary means every later `match` is exhaustive over
//! exactly the formats we can re-encode.

use std::fmt;
use std::str::FromStr;

use super::error::TranscodeError;

/// The three image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
}

impl ImageKind {
    /// Parse a declared `Content-Type` value
    ///
    /// Parameters (`; charset=...`) are ignored and the comparison is on the
    /// lowercased essence, so `IMAGE/PNG` is accepted but `image/jpg` is not.
    pub fn from_mime(declared: &str) -> Result<Self, TranscodeError> {
        let parsed: mime::Mime = declared
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| TranscodeError::unsupported_format(declared))?;

        match parsed.essence_str() {
            "image/png" => Ok(ImageKind::Png),
            "image/jpeg" => Ok(ImageKind::Jpeg),
            "image/gif" => Ok(ImageKind::Gif),
            _ => Err(TranscodeError::unsupported_format(declared)),
        }
    }

    /// Canonical mimetype stored alongside the transcoded bytes
    pub fn content_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
        }
    }

    /// Short codec name used in error messages and log fields
    pub fn name(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Gif => "gif",
        }
    }

    pub fn all() -> [ImageKind; 3] {
        [ImageKind::Png, ImageKind::Jpeg, ImageKind::Gif]
    }
}

impl FromStr for ImageKind {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_supported_types() {
        assert_eq!(ImageKind::from_mime("image/png").unwrap(), ImageKind::Png);
        assert_eq!(ImageKind::from_mime("image/jpeg").unwrap(), ImageKind::Jpeg);
        assert_eq!(ImageKind::from_mime("image/gif").unwrap(), ImageKind::Gif);
    }

    #[test]
    fn test_ignores_parameters_and_case() {
        assert_eq!(
            ImageKind::from_mime("Image/PNG; foo=bar").unwrap(),
            ImageKind::Png
        );
    }

    #[test]
    fn test_rejects_everything_else() {
        for declared in ["image/bmp", "image/webp", "image/jpg", "text/plain", "", "garbage"] {
            assert!(
                matches!(
                    ImageKind::from_mime(declared),
                    Err(TranscodeError::UnsupportedFormat { .. })
                ),
                "{declared:?} should be unsupported"
            );
        }
    }

    #[test]
    fn test_content_type_round_trips() {
        for kind in ImageKind::all() {
            assert_eq!(kind.content_type().parse::<ImageKind>().unwrap(), kind);
        }
    }
}
