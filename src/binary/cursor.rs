//! Sequential, position-tracking reader over an in-memory buffer.

use std::marker::PhantomData;

use byteorder::{ByteOrder, LittleEndian};

use crate::util::{Error, Result};

/// Strings are decoded in spans of at most this many bytes.
pub const STRING_CHUNK_SIZE: usize = 0x8000;

/// Reader over an immutable byte buffer.
///
/// Every read consumes a fixed number of bytes and advances the position by
/// exactly that amount. A read that would cross the end of the buffer fails
/// with [`Error::UnexpectedEof`] and leaves the position untouched.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a, B: ByteOrder = LittleEndian> {
    data: &'a [u8],
    pos: usize,
    _order: PhantomData<B>,
}

impl<'a, B: ByteOrder> ByteCursor<'a, B> {
    /// Create a cursor at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, _order: PhantomData }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left after the current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move to an absolute position. Seeking to the very end is allowed.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::UnexpectedEof(pos as u64));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance past `len` bytes without looking at them.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.take(len).map(|_| ())
    }

    /// Consume the next `len` bytes.
    #[inline]
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or(Error::UnexpectedEof(u64::MAX))?;
        if end > self.data.len() {
            return Err(Error::UnexpectedEof(end as u64));
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Extract a raw sub-range of the buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(B::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(B::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(B::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(B::read_i32(self.take(4)?))
    }

    /// Read a full-width unsigned 64-bit value (never narrowed to f64).
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(B::read_u64(self.take(8)?))
    }

    /// Read a full-width signed 64-bit value.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(B::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(B::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(B::read_f64(self.take(8)?))
    }

    /// Read `len` bytes and decode them as (lossy) UTF-8.
    pub fn read_string(&mut self, len: usize) -> Result<String> {
        Ok(decode_string(self.take(len)?))
    }
}

/// Decode bytes as UTF-8 in bounded chunks, replacing invalid sequences.
///
/// A multi-byte sequence cut by a chunk boundary is carried into the next
/// chunk, so the result matches a single-pass lossy decode.
pub fn decode_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut start = 0;

    while start < bytes.len() {
        let end = (start + STRING_CHUNK_SIZE).min(bytes.len());
        let chunk = &bytes[start..end];

        match std::str::from_utf8(chunk) {
            Ok(s) => {
                out.push_str(s);
                start = end;
            }
            Err(e) => {
                let valid = e.valid_up_to();
                out.push_str(std::str::from_utf8(&chunk[..valid]).unwrap_or_default());
                match e.error_len() {
                    Some(bad) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        start += valid + bad;
                    }
                    None if end == bytes.len() => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        start = end;
                    }
                    None => start += valid,
                }
            }
        }
    }

    out
}
