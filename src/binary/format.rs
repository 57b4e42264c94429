//! Binary FBX format constants.

/// Magic bytes at the start of a binary FBX file.
pub const FBX_MAGIC: &[u8; 21] = b"Kaydara FBX Binary  \x00";

/// Offset of the two flag bytes following the magic.
pub const FLAGS_OFFSET: usize = 21;

/// Offset of the format version (u32 LE).
pub const VERSION_OFFSET: usize = 23;

/// Size of the preamble: magic, flags, version.
pub const PREAMBLE_SIZE: usize = 27;

/// The only version using 32-bit record header fields.
pub const LEGACY_VERSION: u32 = 7400;

/// First version using 64-bit record header fields.
pub const MODERN_MIN_VERSION: u32 = 7500;

/// Size of an empty terminator header with 32-bit fields.
pub const LEGACY_NULL_RECORD_SIZE: usize = 13;

/// Size of an empty terminator header with 64-bit fields.
pub const MODERN_NULL_RECORD_SIZE: usize = 25;

// Scalar property type tags.
pub const TAG_BOOL: u8 = b'C';
pub const TAG_INT16: u8 = b'Y';
pub const TAG_INT32: u8 = b'I';
pub const TAG_INT64: u8 = b'L';
pub const TAG_FLOAT32: u8 = b'F';
pub const TAG_FLOAT64: u8 = b'D';
pub const TAG_STRING: u8 = b'S';
pub const TAG_RAW: u8 = b'R';

// Array property type tags.
pub const TAG_BOOL_ARRAY: u8 = b'b';
pub const TAG_INT32_ARRAY: u8 = b'i';
pub const TAG_INT64_ARRAY: u8 = b'l';
pub const TAG_FLOAT32_ARRAY: u8 = b'f';
pub const TAG_FLOAT64_ARRAY: u8 = b'd';

/// Array encoding flag for plain (uncompressed) payloads.
pub const ENCODING_PLAIN: u32 = 0;

/// Byte width of one element of the array type `tag`.
/// Unknown tags have no width; their payload is skipped.
#[inline]
pub const fn array_element_width(tag: u8) -> usize {
    match tag {
        TAG_BOOL_ARRAY => 1,
        TAG_INT32_ARRAY | TAG_FLOAT32_ARRAY => 4,
        TAG_INT64_ARRAY | TAG_FLOAT64_ARRAY => 8,
        _ => 0,
    }
}

/// Check if a version is readable at all.
#[inline]
pub const fn is_supported_version(version: u32) -> bool {
    version == LEGACY_VERSION || version >= MODERN_MIN_VERSION
}
