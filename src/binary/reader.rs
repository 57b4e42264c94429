//! Record tree reader.

use std::io::Read;
use std::path::Path;

use super::cursor::ByteCursor;
use super::format::*;
use super::header::HeaderLayout;
use super::property::read_property;
use crate::core::{Inflate, ZlibInflate};
use crate::tree::{Document, NodeId, Property, Value};
use crate::util::{Error, Result};

/// Options controlling how a file is read.
#[derive(Clone, Copy, Debug)]
pub struct ReadOptions {
    /// Memory-map files in [`Document::open_opts`] instead of reading them
    /// into a buffer. Ignored without the `mmap` feature.
    pub use_mmap: bool,
    /// Reject records whose end offset lies outside the buffer or behind
    /// the cursor.
    pub strict_bounds: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            use_mmap: true,
            strict_bounds: true,
        }
    }
}

/// What to do with the record just read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// No nested records: attach the values to the current node.
    Attach,
    /// Nested records follow: open a new node and make it current.
    Descend,
    /// Empty header: the current node's child list is over.
    Ascend,
}

/// Validate the preamble and return the format version.
pub fn read_preamble(data: &[u8]) -> Result<u32> {
    if data.len() < PREAMBLE_SIZE {
        return Err(Error::UnexpectedEof(data.len() as u64));
    }

    if &data[..FLAGS_OFFSET] != FBX_MAGIC {
        return Err(Error::InvalidMagic);
    }

    let mut cursor: ByteCursor = ByteCursor::new(data);
    cursor.seek(VERSION_OFFSET)?;
    cursor.read_u32()
}

/// Decode a binary FBX buffer with the default zlib backend.
pub fn parse(data: &[u8]) -> Result<Document> {
    parse_with(data, &ZlibInflate, &ReadOptions::default())
}

/// Decode a binary FBX buffer.
///
/// Starting at the unnamed root, each record header is read together with
/// its property values. If the cursor then sits exactly at the record's end
/// offset the record has no children and becomes a property of the current
/// node. Otherwise a non-zero end offset opens a child node, and a zero end
/// offset closes the current node. Closing the root ends the parse.
pub fn parse_with(data: &[u8], inflate: &dyn Inflate, options: &ReadOptions) -> Result<Document> {
    let _span = tracing::debug_span!("parse", len = data.len()).entered();

    let version = read_preamble(data)?;
    let layout = HeaderLayout::for_version(version)?;
    tracing::debug!(version, ?layout, "reading records");

    let mut cursor: ByteCursor = ByteCursor::new(data);
    cursor.seek(PREAMBLE_SIZE)?;

    let mut doc = Document::new(version);
    let mut current = NodeId::ROOT;

    loop {
        let start = cursor.position();
        let header = layout.read_header(&mut cursor)?;

        let mut values = Vec::with_capacity(header.property_count.min(64) as usize);
        for _ in 0..header.property_count {
            values.push(read_property(&mut cursor, inflate)?);
        }

        let pos = cursor.position() as u64;
        let step = if pos == header.end_offset {
            Step::Attach
        } else if header.end_offset != 0 {
            Step::Descend
        } else {
            Step::Ascend
        };

        match step {
            Step::Attach => {
                if values.is_empty() {
                    tracing::trace!(name = %header.name, start, "empty leaf record");
                    continue;
                }
                tracing::trace!(name = %header.name, count = values.len(), "attach property");
                doc.add_property(current, Property {
                    name: header.name,
                    value: Value::from_values(values),
                });
            }
            Step::Descend => {
                if options.strict_bounds && (header.end_offset < pos || header.end_offset > data.len() as u64) {
                    return Err(Error::invalid(format!(
                        "Record '{}' at {} ends at {}, outside {}..{}",
                        header.name,
                        start,
                        header.end_offset,
                        pos,
                        data.len()
                    )));
                }
                tracing::trace!(name = %header.name, start, end = header.end_offset, "descend");
                current = doc.add_child(current, header.name, values);
            }
            Step::Ascend => match doc.parent_of(current) {
                Some(parent) => {
                    tracing::trace!(pos, "ascend");
                    current = parent;
                }
                None => break,
            },
        }
    }

    tracing::debug!(records = doc.len(), end = cursor.position(), "parse complete");
    Ok(doc)
}

impl Document {
    /// Parse a binary FBX buffer. See [`parse`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        parse(data)
    }

    /// Read and parse a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, &ReadOptions::default())
    }

    /// Read and parse a file with explicit options.
    pub fn open_opts(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        tracing::debug!(path = %path.display(), mmap = options.use_mmap, "opening file");
        parse_file(file, options)
    }
}

#[cfg(feature = "mmap")]
fn parse_file(file: std::fs::File, options: &ReadOptions) -> Result<Document> {
    if options.use_mmap && file.metadata()?.len() > 0 {
        // Safety: the file is opened read-only and the map is dropped
        // before this function returns.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| Error::MmapFailed(e.to_string()))?;
        return parse_with(&mmap, &ZlibInflate, options);
    }
    read_file(file, options)
}

#[cfg(not(feature = "mmap"))]
fn parse_file(file: std::fs::File, options: &ReadOptions) -> Result<Document> {
    read_file(file, options)
}

fn read_file(mut file: std::fs::File, options: &ReadOptions) -> Result<Document> {
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    parse_with(&data, &ZlibInflate, options)
}
