//! Image upload pipeline
//!
//! Uploads pass through three stages before they are persisted:
//! - `UploadGate` checks the declared length and content type
//! - `ImageTranscoder` re-encodes the body (see `crate::transcode`)
//! - the result is gzip-compressed and handed to an `ImageStore`
//!
//! `UploadService` wires the stages together and serves stored images back.

mod gate;
mod service;
mod store;

pub use gate::{parse_content_length, AdmissionError, UploadGate, Verdict};
pub use service::{UploadReceipt, UploadService};
pub use store::{ImageStore, MemoryImageStore, StoreError, StoredImage};
