//! Geometry decoding.
//!
//! - [`polygon`] - end-marker polygon streams to triangle fans
//! - [`components`] - gathering attribute tuples through index streams
//! - [`MeshGeometry`] - flat render-ready arrays from a `Geometry` record

pub mod polygon;
pub mod components;
mod mesh;

pub use polygon::{decode_polygon_vertex_indexes, polygon_vertex_index_to_direct, polygon_count};
pub use components::{
    get_indexed_components, get_indexed_2d_components, get_indexed_3d_components, VertexIndex,
};
pub use mesh::*;
