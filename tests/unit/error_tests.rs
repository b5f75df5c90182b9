// Error mapping tests: status codes and client-safe messages

use brewcache::cache::AssetError;
use brewcache::compression::CompressionError;
use brewcache::error::{ServiceError, PUBLIC_BAD_REQUEST, PUBLIC_INTERNAL, PUBLIC_NOT_FOUND};
use brewcache::transcode::TranscodeError;
use brewcache::upload::{AdmissionError, StoreError};

#[test]
fn test_every_error_maps_to_expected_status() {
    let cases: Vec<(ServiceError, u16)> = vec![
        (AssetError::invalid_name("../etc/passwd").into(), 400),
        (AssetError::not_found("gone.js").into(), 404),
        (AssetError::read_failure("a.js", "EIO").into(), 500),
        (AdmissionError::LengthRequired.into(), 411),
        (
            AdmissionError::TooLarge {
                length: 5_000_000,
                limit: 5_000_000,
            }
            .into(),
            413,
        ),
        (
            AdmissionError::UnsupportedFormat {
                content_type: "image/bmp".to_string(),
            }
            .into(),
            415,
        ),
        (TranscodeError::unsupported_format("image/webp").into(), 415),
        (TranscodeError::decode_failure("GIF", "truncated").into(), 500),
        (TranscodeError::encode_failure("JPEG", "io").into(), 500),
        (CompressionError::CorruptStream("bad header".to_string()).into(), 500),
        (StoreError::not_found("abc").into(), 404),
        (StoreError::Backend("down".to_string()).into(), 500),
        (ServiceError::UnknownResident("x.html".to_string()), 404),
        (ServiceError::Internal("join".to_string()), 500),
    ];

    for (err, status) in cases {
        assert_eq!(err.to_http_status(), status, "{}", err);
    }
}

#[test]
fn test_public_messages() {
    assert_eq!(
        ServiceError::from(AssetError::invalid_name("a/b")).public_message(),
        PUBLIC_BAD_REQUEST
    );
    assert_eq!(
        ServiceError::from(AssetError::not_found("a.js")).public_message(),
        "File doesn't exist"
    );
    assert_eq!(
        ServiceError::from(TranscodeError::unsupported_format("image/bmp")).public_message(),
        "Format not Supported (PNG, JPEG, GIF)"
    );
    assert_eq!(
        ServiceError::from(StoreError::not_found("x")).public_message(),
        PUBLIC_NOT_FOUND
    );
    assert_eq!(
        ServiceError::from(CompressionError::CompressionFailed("x".to_string())).public_message(),
        PUBLIC_INTERNAL
    );
}

#[test]
fn test_internal_detail_stays_in_display() {
    let err = ServiceError::from(AssetError::read_failure("app.js", "/srv/assets/app.js: EACCES"));
    assert!(err.to_string().contains("EACCES"));
    assert!(!err.public_message().contains("EACCES"));
}
