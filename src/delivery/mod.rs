//! HTTP delivery of cached resources
//!
//! Turns cache entries and stored images into `http::Response<Bytes>`
//! values, applying conditional request rules (`If-None-Match`,
//! `If-Modified-Since`) and the per-class `Cache-Control` header.

mod conditional;
mod http_date;
mod response;
mod service;

pub use conditional::{evaluate, evaluate_headers, Evaluation, Representation, Validators};
pub use http_date::{format_http_date, parse_http_date};
pub use response::{error_response, json_response, not_modified, respond};
pub use service::AssetService;
