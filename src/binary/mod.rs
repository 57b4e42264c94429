//! Low-level binary FBX decoding.
//!
//! ## File Structure
//!
//! ```text
//! +--------------------------+
//! | "Kaydara FBX Binary  \0" |  21 bytes
//! +--------------------------+
//! | Flags                    |  2 bytes (0x1A 0x00)
//! +--------------------------+
//! | Version                  |  4 bytes (u32 LE)
//! +--------------------------+
//! | Records ...              |  nested, see [`header`]
//! +--------------------------+
//! | Empty header             |  closes the top level
//! +--------------------------+
//! | Footer                   |  ignored
//! +--------------------------+
//! ```

mod format;
mod cursor;
pub mod header;
mod property;
mod reader;

pub use format::*;
pub use cursor::{ByteCursor, decode_string, STRING_CHUNK_SIZE};
pub use header::{HeaderLayout, RecordHeader};
pub use property::{ArrayValue, PropertyValue, read_property};
pub use reader::{ReadOptions, parse, parse_with, read_preamble};
