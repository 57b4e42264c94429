//! # FBX
//!
//! Reader for binary FBX scene files (format 7.4 and 7.5+).
//!
//! A file is decoded into an arena-backed record tree; mesh helpers turn the
//! polygon and layer arrays of a `Geometry` record into flat triangle data.
//!
//! ## Modules
//!
//! - [`util`] - Error type
//! - [`core`] - Array decompression
//! - [`binary`] - Preamble, record headers, property values and the tree reader
//! - [`tree`] - Decoded [`Document`] and [`Node`] handles
//! - [`geom`] - Polygon triangulation, attribute expansion, mesh extraction
//! - [`scene`] - Objects, connections and `Properties70` lookups
//!
//! ## Example
//!
//! ```ignore
//! use fbx::Document;
//!
//! let doc = Document::open("cube.fbx")?;
//! println!("version {}", doc.version());
//!
//! for mesh in doc.meshes()? {
//!     println!("{}: {} triangles", mesh.name, mesh.num_triangles());
//! }
//! ```

pub mod util;
pub mod core;
pub mod binary;
pub mod tree;
pub mod geom;
pub mod scene;

// Re-export commonly used types
pub use util::{Error, Result};
pub use binary::{parse, parse_with, ArrayValue, PropertyValue, ReadOptions};
pub use tree::{Document, Node, NodeId, Property, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::binary::{parse, ArrayValue, PropertyValue, ReadOptions};
    pub use crate::tree::{Document, Node, NodeId, Property, Value};
    pub use crate::geom::*;
    pub use crate::scene::{object_name, Connection};
}
