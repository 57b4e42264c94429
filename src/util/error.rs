//! Error types for the FBX library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FBX operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid magic bytes at start of file
    #[error("Invalid FBX file: expected binary FBX magic bytes")]
    InvalidMagic,

    /// Unsupported file format version
    #[error("Unsupported FBX version: {0}")]
    UnsupportedVersion(u32),

    /// A read would run past the end of the buffer
    #[error("Unexpected end of file at position {0}")]
    UnexpectedEof(u64),

    /// Invalid record structure in file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// Compressed array payload could not be inflated
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// Decoded array bytes don't match the declared element count
    #[error("Array length mismatch: expected {expected} bytes, got {actual}")]
    ArrayLengthMismatch { expected: usize, actual: usize },

    /// Attribute or polygon index outside of the addressed buffer
    #[error("Index {index} out of bounds (len: {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Polygon with fewer than three corners
    #[error("Degenerate polygon at offset {offset} ({len} entries)")]
    DegeneratePolygon { offset: usize, len: usize },

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }
}

/// Result type alias for FBX operations.
pub type Result<T> = std::result::Result<T, Error>;
