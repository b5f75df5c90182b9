//! Conditional request evaluation
//!
//! Decides between 304 Not Modified and a full response:
//! 1. `If-None-Match` present, non-empty and byte-equal to the ETag → 304
//! 2. else `If-Modified-Since` parses and the resource was modified before
//!    that date plus one second → 304
//! 3. else → full response
//!
//! The one-second pad absorbs the whole-second resolution of HTTP dates
//! against sub-second file system mtimes.

use bytes::Bytes;
use http::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use http::header::HeaderName;
use http::HeaderMap;
use std::time::{Duration, SystemTime};

use super::http_date::parse_http_date;
use crate::cache::CacheEntry;
use crate::upload::StoredImage;

/// Metadata a client can validate its cached copy against
pub trait Validators {
    fn etag(&self) -> &str;
    fn last_modified(&self) -> SystemTime;
}

/// A resource that can be sent as a gzip-encoded body
pub trait Representation: Validators {
    fn content_type(&self) -> &str;
    /// Gzip stream sent as the body
    fn gzip_body(&self) -> Bytes;
}

impl Validators for CacheEntry {
    fn etag(&self) -> &str {
        &self.etag
    }

    fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}

impl Representation for CacheEntry {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn gzip_body(&self) -> Bytes {
        self.compressed.clone()
    }
}

impl Validators for StoredImage {
    fn etag(&self) -> &str {
        &self.etag
    }

    fn last_modified(&self) -> SystemTime {
        self.stored_at
    }
}

impl Representation for StoredImage {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn gzip_body(&self) -> Bytes {
        self.compressed.clone()
    }
}

/// Outcome of a conditional request check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    NotModified,
    Send,
}

/// Evaluate raw `If-None-Match` / `If-Modified-Since` values against `resource`
pub fn evaluate<V: Validators + ?Sized>(
    resource: &V,
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
) -> Evaluation {
    if let Some(tag) = if_none_match {
        if !tag.is_empty() && tag == resource.etag() {
            return Evaluation::NotModified;
        }
    }

    if let Some(since) = if_modified_since.and_then(parse_http_date) {
        if resource.last_modified() < since + Duration::from_secs(1) {
            return Evaluation::NotModified;
        }
    }

    Evaluation::Send
}

/// Evaluate using the conditional headers of a request
pub fn evaluate_headers<V: Validators + ?Sized>(resource: &V, headers: &HeaderMap) -> Evaluation {
    let header = |name: HeaderName| headers.get(name).and_then(|v| v.to_str().ok());
    evaluate(resource, header(IF_NONE_MATCH), header(IF_MODIFIED_SINCE))
}
