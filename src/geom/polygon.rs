//! Polygon vertex index decoding.
//!
//! `PolygonVertexIndex` stores polygons back to back. The last corner of
//! each polygon is written as `-(index + 1)`, so a negative entry marks the
//! end of a polygon without a separate count array:
//!
//! ```text
//! [0, 4, 6, -3,  8, 7, 3, -7]
//!  triangle      quad
//!  0 4 6 2       8 7 3 6
//! ```
//!
//! Both decoders split every polygon into a triangle fan anchored on its
//! first corner, so an n-gon yields `n - 2` triangles.

use crate::util::{Error, Result};

/// Recover the vertex index from an end-of-polygon marker.
#[inline]
pub const fn decode_sentinel(value: i32) -> i32 {
    -(value + 1)
}

/// Walk the polygons and call `emit(offset, a, b)` once per fan triangle,
/// where `offset` is the polygon's first position and `a`, `b` are the
/// positions of the other two corners.
fn for_each_fan<F>(indexes: &[i32], mut emit: F) -> Result<()>
where
    F: FnMut(usize, usize, usize),
{
    let mut offset = 0;

    for (i, &value) in indexes.iter().enumerate() {
        if value >= 0 {
            continue;
        }

        let len = i + 1 - offset;
        if len < 3 {
            return Err(Error::DegeneratePolygon { offset, len });
        }

        for j in offset..=i - 2 {
            emit(offset, j + 1, j + 2);
        }
        offset = i + 1;
    }

    if offset < indexes.len() {
        tracing::warn!(
            offset,
            trailing = indexes.len() - offset,
            "ignoring unterminated polygon"
        );
    }

    Ok(())
}

/// Triangulate polygons, keeping the original vertex indices.
///
/// Each triangle is `(first, j + 1, j + 2)` over the polygon's corners; the
/// corner carrying the end marker is decoded back to its vertex index.
pub fn decode_polygon_vertex_indexes(indexes: &[i32]) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(indexes.len() * 2);

    for_each_fan(indexes, |first, a, b| {
        for pos in [first, a, b] {
            let value = indexes[pos];
            let vertex = if value < 0 { decode_sentinel(value) } else { value };
            out.push(vertex as u32);
        }
    })?;

    Ok(out)
}

/// Triangulate polygons into positions within the polygon vertex stream.
///
/// Instead of vertex indices this emits the position of each triangle
/// corner in `indexes` (counted from the start of the whole array). The
/// result addresses per-polygon-vertex attributes stored in `Direct` mode.
pub fn polygon_vertex_index_to_direct(indexes: &[i32]) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(indexes.len() * 2);

    for_each_fan(indexes, |first, a, b| {
        out.extend_from_slice(&[first as u32, a as u32, b as u32]);
    })?;

    Ok(out)
}

/// Number of polygons (end markers) in a polygon vertex index array.
pub fn polygon_count(indexes: &[i32]) -> usize {
    indexes.iter().filter(|&&v| v < 0).count()
}
