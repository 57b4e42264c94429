//! Gather per-vertex attribute tuples through an index stream.

use crate::util::{Error, Result};

/// Integer types usable as an index stream.
pub trait VertexIndex: Copy {
    /// The index as a signed 64-bit value.
    fn to_i64(self) -> i64;
}

impl VertexIndex for u32 {
    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }
}

impl VertexIndex for i32 {
    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }
}

impl VertexIndex for usize {
    #[inline]
    fn to_i64(self) -> i64 {
        self as i64
    }
}

/// Gather `components` consecutive values for every index.
///
/// Output tuple `i` is `coordinates[indexes[i] * components ..][..components]`.
/// An empty `coordinates` buffer means the attribute is absent and yields an
/// empty result. An index addressing past the buffer, or a zero
/// `components` width, is an error.
pub fn get_indexed_components<T, I>(coordinates: &[T], indexes: &[I], components: usize) -> Result<Vec<T>>
where
    T: Copy,
    I: VertexIndex,
{
    if components == 0 {
        return Err(Error::invalid("Attribute tuples need at least one component"));
    }
    if coordinates.is_empty() {
        return Ok(Vec::new());
    }

    let count = coordinates.len() / components;
    let mut out = Vec::with_capacity(indexes.len() * components);

    for &index in indexes {
        let index = index.to_i64();
        if index < 0 || index as usize >= count {
            return Err(Error::IndexOutOfBounds { index, len: count });
        }
        let start = index as usize * components;
        out.extend_from_slice(&coordinates[start..start + components]);
    }

    Ok(out)
}

/// Gather 2-component tuples (texture coordinates).
pub fn get_indexed_2d_components<T: Copy, I: VertexIndex>(coordinates: &[T], indexes: &[I]) -> Result<Vec<T>> {
    get_indexed_components(coordinates, indexes, 2)
}

/// Gather 3-component tuples (positions, normals).
pub fn get_indexed_3d_components<T: Copy, I: VertexIndex>(coordinates: &[T], indexes: &[I]) -> Result<Vec<T>> {
    get_indexed_components(coordinates, indexes, 3)
}
