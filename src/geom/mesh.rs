//! Render-ready mesh data from a `Geometry` record.
//!
//! Positions, normals and UVs are expanded to one tuple per emitted triangle
//! corner, so `positions[i * 3..]`, `normals[i * 3..]` and `uvs[i * 2..]`
//! describe the same corner `i`.

use super::components::{get_indexed_components, get_indexed_3d_components};
use super::polygon::{decode_polygon_vertex_indexes, polygon_count, polygon_vertex_index_to_direct};
use crate::scene::object_name;
use crate::tree::Node;
use crate::util::{Error, Result};

/// Geometry record name under `Objects`.
pub const GEOMETRY: &str = "Geometry";
pub const VERTICES: &str = "Vertices";
pub const POLYGON_VERTEX_INDEX: &str = "PolygonVertexIndex";
pub const EDGES: &str = "Edges";
pub const LAYER_ELEMENT_NORMAL: &str = "LayerElementNormal";
pub const LAYER_ELEMENT_UV: &str = "LayerElementUV";

/// How a layer element's values are distributed over the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingMode {
    /// One value per polygon corner.
    ByPolygonVertex,
    /// One value per control point.
    ByVertex,
    /// A single value for the whole mesh.
    AllSame,
}

impl MappingMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ByPolygonVertex" => Some(Self::ByPolygonVertex),
            "ByVertice" | "ByVertex" => Some(Self::ByVertex),
            "AllSame" => Some(Self::AllSame),
            _ => None,
        }
    }
}

/// How a layer element's values are addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceMode {
    /// Values are stored in mapping order.
    Direct,
    /// Values are reached through a separate index array.
    IndexToDirect,
}

impl ReferenceMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Direct" => Some(Self::Direct),
            "IndexToDirect" | "Index" => Some(Self::IndexToDirect),
            _ => None,
        }
    }
}

/// Triangulated mesh with flat per-corner attribute arrays.
#[derive(Clone, Debug, Default)]
pub struct MeshGeometry {
    /// Object name without the class suffix.
    pub name: String,
    /// Object id (first attribute of the record).
    pub id: Option<i64>,
    /// Control points, 3 components each.
    pub vertices: Vec<f64>,
    /// Raw polygon stream with end-of-polygon markers.
    pub polygon_vertex_index: Vec<i32>,
    pub edges: Option<Vec<i32>>,
    /// Control point index per triangle corner.
    pub indices: Vec<u32>,
    /// Position per triangle corner (xyz).
    pub positions: Vec<f32>,
    /// Normal per triangle corner (xyz).
    pub normals: Option<Vec<f32>>,
    /// Texture coordinate per triangle corner (uv).
    pub uvs: Option<Vec<f32>>,
}

impl MeshGeometry {
    /// Extract a mesh from a `Geometry` node.
    pub fn from_node(node: Node<'_>) -> Result<Self> {
        let _span = tracing::debug_span!("mesh", id = node.id().index()).entered();

        let vertices = node
            .find_property_value_by_name(VERTICES)
            .and_then(|v| v.as_single())
            .and_then(|v| v.as_array())
            .and_then(|a| a.to_f64_vec())
            .ok_or_else(|| Error::invalid(format!("{} has no {} array", node.path(), VERTICES)))?;

        let polygon_vertex_index = node
            .find_property_value_by_name(POLYGON_VERTEX_INDEX)
            .and_then(|v| v.as_single())
            .and_then(|v| v.as_i32_array())
            .ok_or_else(|| {
                Error::invalid(format!("{} has no {} array", node.path(), POLYGON_VERTEX_INDEX))
            })?
            .to_vec();

        let edges = node
            .find_property_value_by_name(EDGES)
            .and_then(|v| v.as_single())
            .and_then(|v| v.as_i32_array())
            .map(<[i32]>::to_vec);

        let indices = decode_polygon_vertex_indexes(&polygon_vertex_index)?;
        let positions = to_f32(get_indexed_3d_components(&vertices, &indices)?);

        let mut mesh = Self {
            name: object_name(node).unwrap_or_default().to_string(),
            id: node.object_id(),
            vertices,
            polygon_vertex_index,
            edges,
            indices,
            positions,
            normals: None,
            uvs: None,
        };

        if let Some(layer) = node.find_child_by_name(LAYER_ELEMENT_NORMAL) {
            mesh.normals = Some(mesh.resolve_layer(layer, "Normals", "NormalsIndex", 3)?);
        }
        if let Some(layer) = node.find_child_by_name(LAYER_ELEMENT_UV) {
            mesh.uvs = Some(mesh.resolve_layer(layer, "UV", "UVIndex", 2)?);
        }

        tracing::debug!(
            name = %mesh.name,
            triangles = mesh.num_triangles(),
            normals = mesh.has_normals(),
            uvs = mesh.has_uvs(),
            "extracted mesh"
        );

        Ok(mesh)
    }

    /// Expand one layer element to a per-corner array.
    fn resolve_layer(
        &self,
        layer: Node<'_>,
        data_name: &str,
        index_name: &str,
        components: usize,
    ) -> Result<Vec<f32>> {
        let mapping_name = string_property(layer, "MappingInformationType");
        let mapping = MappingMode::parse(mapping_name).ok_or_else(|| {
            Error::invalid(format!("{}: unsupported mapping '{}'", layer.path(), mapping_name))
        })?;
        let reference_name = string_property(layer, "ReferenceInformationType");
        let reference = ReferenceMode::parse(reference_name).ok_or_else(|| {
            Error::invalid(format!("{}: unsupported reference '{}'", layer.path(), reference_name))
        })?;

        let data = layer
            .find_property_value_by_name(data_name)
            .and_then(|v| v.as_single())
            .and_then(|v| v.as_array())
            .and_then(|a| a.to_f64_vec())
            .unwrap_or_default();

        let base = match mapping {
            MappingMode::ByPolygonVertex => polygon_vertex_index_to_direct(&self.polygon_vertex_index)?,
            MappingMode::ByVertex => self.indices.clone(),
            MappingMode::AllSame => vec![0; self.indices.len()],
        };

        let indexes = match reference {
            ReferenceMode::Direct => base,
            ReferenceMode::IndexToDirect => {
                let index = layer
                    .find_property_value_by_name(index_name)
                    .and_then(|v| v.as_single())
                    .and_then(|v| v.as_i32_array())
                    .ok_or_else(|| {
                        Error::invalid(format!("{} has no {} array", layer.path(), index_name))
                    })?;
                remap(&base, index)?
            }
        };

        Ok(to_f32(get_indexed_components(&data, &indexes, components)?))
    }

    /// Number of control points.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of source polygons.
    pub fn num_polygons(&self) -> usize {
        polygon_count(&self.polygon_vertex_index)
    }

    /// Number of triangles after fan expansion.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        self.normals.as_ref().is_some_and(|n| !n.is_empty())
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.as_ref().is_some_and(|uv| !uv.is_empty())
    }

    /// Axis-aligned bounds of the control points.
    pub fn bounds(&self) -> Option<(glam::Vec3, glam::Vec3)> {
        if self.vertices.len() < 3 {
            return None;
        }

        let mut min = glam::Vec3::splat(f32::MAX);
        let mut max = glam::Vec3::splat(f32::MIN);
        for p in self.vertices.chunks_exact(3) {
            let p = glam::Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32);
            min = min.min(p);
            max = max.max(p);
        }

        Some((min, max))
    }
}

/// String value of a single-valued property, empty when absent.
fn string_property<'a>(node: Node<'a>, name: &str) -> &'a str {
    node.find_property_value_by_name(name)
        .and_then(|v| v.as_single())
        .and_then(|v| v.as_str())
        .unwrap_or_default()
}

/// Map each base position through a layer's index array.
fn remap(base: &[u32], index: &[i32]) -> Result<Vec<u32>> {
    base.iter()
        .map(|&pos| match index.get(pos as usize) {
            Some(&i) if i >= 0 => Ok(i as u32),
            Some(&i) => Err(Error::IndexOutOfBounds { index: i as i64, len: index.len() }),
            None => Err(Error::IndexOutOfBounds { index: pos as i64, len: index.len() }),
        })
        .collect()
}

fn to_f32(values: Vec<f64>) -> Vec<f32> {
    values.into_iter().map(|v| v as f32).collect()
}
