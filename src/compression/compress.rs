//! Core gzip compression and decompression functions
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};

use super::error::CompressionError;

/// Compress data into a gzip stream
///
/// The header carries a zero mtime and no file name, so identical input always
/// produces identical output.
///
/// # Returns
/// * `Ok(Vec<u8>)` - Complete gzip stream (header, deflate body, CRC trailer)
/// * `Err(CompressionError)` - The encoder could not be written to
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::with_capacity(data.len() / 2 + 32), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| CompressionError::CompressionFailed(e.to_string()))
}

/// Decompress a gzip stream produced by [`compress`] (or any conforming encoder)
///
/// # Returns
/// * `Ok(Vec<u8>)` - Original bytes
/// * `Err(CompressionError::CorruptStream)` - Bad header, bad deflate data or CRC mismatch
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decoder = GzDecoder::new(data);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(|e| CompressionError::CorruptStream(e.to_string()))?;
    Ok(result)
}
