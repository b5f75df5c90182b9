//! Gzip codec for cached and uploaded payloads
//!
//! Every body this crate hands out is gzip-encoded exactly once, at population
//! time, and served with `Content-Encoding: gzip`.
//!
//! - [`compress`] - gzip encode/decode
//! - [`error`] - Error types

pub mod compress;
pub mod error;

pub use compress::{compress, decompress};
pub use error::CompressionError;
