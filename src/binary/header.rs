//! Record header layouts.
//!
//! Every record starts with three counters followed by a Pascal-style name:
//!
//! ```text
//! +--------------------+  Legacy (7400)   Modern (>= 7500)
//! | end offset         |  u32             u64
//! | property count     |  u32             u64
//! | property list size |  u32             u64
//! | name length        |  u8              u8
//! | name               |  name length bytes
//! +--------------------+
//! ```
//!
//! A header whose fields are all zero terminates the child list of the
//! enclosing record.

use super::cursor::ByteCursor;
use super::format::*;
use crate::util::{Error, Result};

/// Decoded record header, independent of the on-wire field widths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordHeader {
    /// Absolute file offset one past the end of this record.
    pub end_offset: u64,
    pub property_count: u64,
    pub property_list_len: u64,
    pub name: String,
}

impl RecordHeader {
    /// Check if this is the empty terminator header.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.end_offset == 0
    }
}

/// Header field widths, selected once per file from the format version.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderLayout {
    /// 32-bit counters (version 7400).
    Legacy,
    /// 64-bit counters (version 7500 and later).
    Modern,
}

impl HeaderLayout {
    /// Pick the layout for a format version.
    pub fn for_version(version: u32) -> Result<Self> {
        if version == LEGACY_VERSION {
            Ok(Self::Legacy)
        } else if version >= MODERN_MIN_VERSION {
            Ok(Self::Modern)
        } else {
            Err(Error::UnsupportedVersion(version))
        }
    }

    /// Size in bytes of an empty terminator header in this layout.
    #[inline]
    pub const fn null_record_size(self) -> usize {
        match self {
            Self::Legacy => LEGACY_NULL_RECORD_SIZE,
            Self::Modern => MODERN_NULL_RECORD_SIZE,
        }
    }

    /// Read one counter field.
    #[inline]
    fn read_field(self, cursor: &mut ByteCursor<'_>) -> Result<u64> {
        match self {
            Self::Legacy => cursor.read_u32().map(u64::from),
            Self::Modern => cursor.read_u64(),
        }
    }

    /// Read a record header at the cursor.
    pub fn read_header(self, cursor: &mut ByteCursor<'_>) -> Result<RecordHeader> {
        let end_offset = self.read_field(cursor)?;
        let property_count = self.read_field(cursor)?;
        let property_list_len = self.read_field(cursor)?;
        let name_len = cursor.read_u8()? as usize;
        let name = cursor.read_string(name_len)?;

        Ok(RecordHeader {
            end_offset,
            property_count,
            property_list_len,
            name,
        })
    }
}
