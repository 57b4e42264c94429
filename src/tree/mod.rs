//! Decoded record tree.
//!
//! A binary FBX file is a tree of named records. A record that nests other
//! records becomes a [`Node`]; a record without children becomes a
//! [`Property`] of its parent, holding one [`Value`].
//!
//! ```text
//! (root)
//! +-- FBXHeaderExtension
//! +-- Objects
//! |   +-- Geometry  [id, "Cube\0\x01Geometry", "Mesh"]
//! |   |     Vertices = f64[24]
//! |   |     PolygonVertexIndex = i32[24]
//! |   |   +-- LayerElementNormal [0]
//! |   |         Normals = f64[72]
//! |   +-- Model ...
//! +-- Connections
//!       C = ["OO", id, id]
//! ```
//!
//! All records live in one arena owned by the [`Document`]; parent and child
//! links are [`NodeId`]s.

mod document;
mod node;

pub use document::{Document, NodeId};
pub use node::{Node, Property, Value};
