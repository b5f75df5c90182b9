//! Content fingerprints used as `ETag` values
//!
//! A fingerprint is the SHA-256 digest of the *uncompressed* source bytes,
//! hex-encoded and wrapped in double quotes so it can be placed in an `ETag`
//! header verbatim and compared byte-for-byte against `If-None-Match`.

use sha2::{Digest, Sha256};

/// Compute the quoted hex fingerprint of `bytes`
///
/// ```
/// let tag = brewcache::fingerprint::fingerprint(b"hello");
/// assert!(tag.starts_with('"') && tag.ends_with('"'));
/// assert_eq!(tag.len(), 64 + 2);
/// ```
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("\"{}\"", hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let data = b"body { color: red; }";
        assert_eq!(fingerprint(data), fingerprint(data));
    }

    #[test]
    fn test_fingerprint_differs_for_different_input() {
        assert_ne!(fingerprint(b"a"), fingerprint(b"b"));
        assert_ne!(fingerprint(b""), fingerprint(b"\0"));
    }

    #[test]
    fn test_fingerprint_is_quoted_lowercase_hex() {
        let tag = fingerprint(b"");
        assert_eq!(
            tag,
            "\"e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\""
        );
        let inner = &tag[1..tag.len() - 1];
        assert!(inner.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
