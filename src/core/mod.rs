//! Core layer - capabilities the record parser is generic over.
//!
//! This module provides:
//! - [`Inflate`] - pluggable decompression for compressed array payloads
//! - [`ZlibInflate`] - the default `flate2` backend

mod compression;

pub use compression::{Inflate, ZlibInflate, decompress};
