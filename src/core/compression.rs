//! Decompression support for FBX array payloads.
//!
//! Array properties with a non-zero encoding flag carry a zlib stream
//! (deflate with zlib framing). The record parser only sees the [`Inflate`]
//! trait, so a different backend can be plugged in through
//! [`parse_with`](crate::binary::parse_with).

use std::io::Read;
use flate2::read::ZlibDecoder;

use crate::util::{Error, Result};

/// Turns a compressed byte span back into raw bytes.
pub trait Inflate {
    /// Inflate `data`. `expected_len` is the byte count the caller is about
    /// to interpret. It comes from the file and is not trusted: output past
    /// it may be cut off, and the caller rejects any length other than it.
    fn inflate(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>>;
}

/// zlib inflate backed by `flate2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZlibInflate;

impl Inflate for ZlibInflate {
    fn inflate(&self, data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
        decompress(data, expected_len)
    }
}

/// Upfront allocation is limited to this multiple of the compressed size.
const CAPACITY_RATIO: usize = 4;

/// Decompress a zlib stream, producing at most `expected_len + 1` bytes.
///
/// Unlike a best-effort reader this never falls back to returning the input:
/// a corrupt stream is an error, and no partial output escapes. A stream
/// that inflates past `expected_len` stops one byte over it, so the caller
/// sees the mismatch without inflating the rest.
pub fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let limit = (expected_len as u64).saturating_add(1);
    let capacity = expected_len.min(data.len().saturating_mul(CAPACITY_RATIO));
    let mut decompressed = Vec::with_capacity(capacity);

    ZlibDecoder::new(data)
        .take(limit)
        .read_to_end(&mut decompressed)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    Ok(decompressed)
}
