//! Property value decoding.
//!
//! Each property starts with a one-byte type tag. Scalars follow directly;
//! strings and raw blobs carry a u32 length prefix; arrays carry a
//! 12-byte header:
//!
//! ```text
//! +------------------+
//! | element count    |  u32
//! | encoding         |  u32 (0 = plain, otherwise zlib)
//! | compressed size  |  u32
//! +------------------+
//! | payload          |  encoding ? compressed size : count * width
//! +------------------+
//! ```

use byteorder::{ByteOrder, LittleEndian};

use super::cursor::ByteCursor;
use super::format::*;
use crate::core::Inflate;
use crate::util::{Error, Result};

/// A decoded property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int16(i16),
    Int32(i32),
    /// Full-width 64-bit integer (object ids, time values).
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Raw(Vec<u8>),
    Array(ArrayValue),
}

/// A decoded array property.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayValue {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    /// Array with a tag this reader doesn't know; its payload was skipped.
    Untyped,
}

impl ArrayValue {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Untyped => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool[]",
            Self::Int32(_) => "i32[]",
            Self::Int64(_) => "i64[]",
            Self::Float32(_) => "f32[]",
            Self::Float64(_) => "f64[]",
            Self::Untyped => "?[]",
        }
    }

    /// Copy the elements out as f64, widening integer and f32 arrays.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            Self::Float64(v) => Some(v.clone()),
            Self::Float32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Int32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Bool(_) | Self::Untyped => None,
        }
    }
}

impl PropertyValue {
    /// Type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int16(_) => "i16",
            Self::Int32(_) => "i32",
            Self::Int64(_) => "i64",
            Self::Float32(_) => "f32",
            Self::Float64(_) => "f64",
            Self::String(_) => "string",
            Self::Raw(_) => "raw",
            Self::Array(a) => a.type_name(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, widened from any integer scalar.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int16(v) => Some(*v as i64),
            Self::Int32(v) => Some(*v as i64),
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value, widened from any numeric scalar.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float32(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_i32_array(&self) -> Option<&[i32]> {
        match self {
            Self::Array(ArrayValue::Int32(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64_array(&self) -> Option<&[i64]> {
        match self {
            Self::Array(ArrayValue::Int64(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64_array(&self) -> Option<&[f64]> {
        match self {
            Self::Array(ArrayValue::Float64(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_f32_array(&self) -> Option<&[f32]> {
        match self {
            Self::Array(ArrayValue::Float32(v)) => Some(v),
            _ => None,
        }
    }
}

/// Read one property value at the cursor.
pub fn read_property(cursor: &mut ByteCursor<'_>, inflate: &dyn Inflate) -> Result<PropertyValue> {
    let tag = cursor.read_u8()?;

    let value = match tag {
        TAG_BOOL => PropertyValue::Bool(cursor.read_u8()? != 0),
        TAG_INT16 => PropertyValue::Int16(cursor.read_i16()?),
        TAG_INT32 => PropertyValue::Int32(cursor.read_i32()?),
        TAG_INT64 => PropertyValue::Int64(cursor.read_i64()?),
        TAG_FLOAT32 => PropertyValue::Float32(cursor.read_f32()?),
        TAG_FLOAT64 => PropertyValue::Float64(cursor.read_f64()?),
        TAG_STRING => {
            let len = cursor.read_u32()? as usize;
            PropertyValue::String(cursor.read_string(len)?)
        }
        TAG_RAW => {
            let len = cursor.read_u32()? as usize;
            PropertyValue::Raw(cursor.read_bytes(len)?.to_vec())
        }
        _ => PropertyValue::Array(read_array(tag, cursor, inflate)?),
    };

    Ok(value)
}

/// Read an array property body (everything after the tag).
fn read_array(tag: u8, cursor: &mut ByteCursor<'_>, inflate: &dyn Inflate) -> Result<ArrayValue> {
    let array_len = cursor.read_u32()? as usize;
    let encoding = cursor.read_u32()?;
    let compressed_len = cursor.read_u32()? as usize;

    let width = array_element_width(tag);
    let byte_len = array_len
        .checked_mul(width)
        .ok_or_else(|| Error::invalid(format!("Array of {} elements is too large", array_len)))?;

    let compressed = encoding != ENCODING_PLAIN;
    let stored = cursor.read_bytes(if compressed { compressed_len } else { byte_len })?;

    if width == 0 {
        tracing::warn!(tag = %(tag as char), array_len, "skipping array with unknown type tag");
        return Ok(ArrayValue::Untyped);
    }

    let inflated;
    let bytes = if compressed {
        inflated = inflate.inflate(stored, byte_len)?;
        &inflated[..]
    } else {
        stored
    };

    if bytes.len() != byte_len {
        return Err(Error::ArrayLengthMismatch {
            expected: byte_len,
            actual: bytes.len(),
        });
    }

    let array = match tag {
        TAG_BOOL_ARRAY => ArrayValue::Bool(bytes.iter().map(|&b| b != 0).collect()),
        TAG_INT32_ARRAY => {
            let mut out = vec![0i32; array_len];
            LittleEndian::read_i32_into(bytes, &mut out);
            ArrayValue::Int32(out)
        }
        TAG_INT64_ARRAY => {
            let mut out = vec![0i64; array_len];
            LittleEndian::read_i64_into(bytes, &mut out);
            ArrayValue::Int64(out)
        }
        TAG_FLOAT32_ARRAY => {
            let mut out = vec![0f32; array_len];
            LittleEndian::read_f32_into(bytes, &mut out);
            ArrayValue::Float32(out)
        }
        TAG_FLOAT64_ARRAY => {
            let mut out = vec![0f64; array_len];
            LittleEndian::read_f64_into(bytes, &mut out);
            ArrayValue::Float64(out)
        }
        _ => ArrayValue::Untyped,
    };

    Ok(array)
}
