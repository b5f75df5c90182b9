//! Response assembly for cached and stored resources

use bytes::Bytes;
use http::header::{
    HeaderName, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, ETAG,
    LAST_MODIFIED,
};
use http::{HeaderMap, HeaderValue, Response, StatusCode};
use serde::Serialize;
use std::time::SystemTime;

use super::conditional::{evaluate_headers, Evaluation, Representation};
use super::http_date::format_http_date;
use crate::error::ServiceError;

/// Build the 200 or 304 response for `resource`
///
/// A 200 carries the gzip body with `Content-Encoding: gzip`; a 304 carries
/// only the validators.
pub fn respond<R: Representation + ?Sized>(
    resource: &R,
    cache_control: &str,
    request_headers: &HeaderMap,
) -> Response<Bytes> {
    if evaluate_headers(resource, request_headers) == Evaluation::NotModified {
        return not_modified(resource.etag(), resource.last_modified());
    }

    let body = resource.gzip_body();
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    insert_header(headers, ETAG, resource.etag());
    insert_header(
        headers,
        LAST_MODIFIED,
        &format_http_date(resource.last_modified()),
    );
    insert_header(headers, CONTENT_TYPE, resource.content_type());
    headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    insert_header(headers, CACHE_CONTROL, cache_control);
    headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    *response.body_mut() = body;
    response
}

/// 304 with `ETag` and `Last-Modified` and an empty body
pub fn not_modified(etag: &str, last_modified: SystemTime) -> Response<Bytes> {
    let mut response = Response::new(Bytes::new());
    *response.status_mut() = StatusCode::NOT_MODIFIED;
    let headers = response.headers_mut();
    insert_header(headers, ETAG, etag);
    insert_header(headers, LAST_MODIFIED, &format_http_date(last_modified));
    response
}

/// Serialize `value` as a JSON response body
pub fn json_response<T: Serialize>(status: u16, value: &T) -> Response<Bytes> {
    let (status, body) = match serde_json::to_vec(value) {
        Ok(body) => (status, body),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize JSON response");
            (500, br#"{"public":"Something Went Wrong"}"#.to_vec())
        }
    };

    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[derive(Serialize)]
struct PublicError<'a> {
    public: &'a str,
}

/// Render `err` as `{"public": "..."}` with its mapped status
///
/// The internal error text is logged, never sent.
pub fn error_response(err: &ServiceError) -> Response<Bytes> {
    let status = err.to_http_status();
    if status >= 500 {
        tracing::error!(status, error = %err, "Request failed");
    } else {
        tracing::debug!(status, error = %err, "Request rejected");
    }
    json_response(
        status,
        &PublicError {
            public: err.public_message(),
        },
    )
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::warn!(header = %name, value = %value, "Dropping invalid header value");
        }
    }
}
