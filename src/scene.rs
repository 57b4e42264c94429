//! Object and connection lookups over a decoded [`Document`].
//!
//! Scene content lives under the top-level `Objects` record, one child per
//! object, each carrying `[id, "Name\0\x01Class", subclass]` as attributes.
//! How objects relate is stored separately in `Connections`:
//!
//! ```text
//! Connections
//!     C = ["OO", child id, parent id]
//!     C = ["OP", child id, parent id, "DiffuseColor"]
//! ```

use crate::geom::{MeshGeometry, GEOMETRY, VERTICES};
use crate::tree::{Document, Node, Value};
use crate::util::Result;

pub const OBJECTS: &str = "Objects";
pub const CONNECTIONS: &str = "Connections";
pub const PROPERTIES70: &str = "Properties70";

/// Separator between object name and class in binary files.
const NAME_CLASS_SEPARATOR: &str = "\u{0}\u{1}";

/// One entry of the `Connections` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    /// `"OO"` (object to object), `"OP"` (object to property), ...
    pub kind: String,
    pub child: i64,
    pub parent: i64,
    /// Target property name for `"OP"` connections.
    pub property: Option<String>,
}

impl Connection {
    /// Decode one `C` property value.
    pub fn from_value(value: &Value) -> Option<Self> {
        let values = value.as_slice();
        Some(Self {
            kind: values.first()?.as_str()?.to_string(),
            child: values.get(1)?.as_i64()?,
            parent: values.get(2)?.as_i64()?,
            property: values.get(3).and_then(|v| v.as_str()).map(str::to_string),
        })
    }

    /// Check if this links two objects.
    pub fn is_object_object(&self) -> bool {
        self.kind == "OO"
    }

    /// Check if this links an object to a property of another.
    pub fn is_object_property(&self) -> bool {
        self.kind == "OP"
    }
}

/// Object name from the second attribute, without the class suffix.
pub fn object_name<'a>(node: Node<'a>) -> Option<&'a str> {
    let full = node.attributes().get(1)?.as_str()?;
    Some(full.split(NAME_CLASS_SEPARATOR).next().unwrap_or(full))
}

impl<'a> Node<'a> {
    /// Object id: the first attribute when it is an integer.
    pub fn object_id(&self) -> Option<i64> {
        self.attributes().first()?.as_i64()
    }

    /// Look up a `P` entry by name in this record's `Properties70` child.
    ///
    /// The returned value holds the whole entry:
    /// `[name, type, label, flags, values...]`.
    pub fn find_p70(&self, name: &str) -> Option<&'a Value> {
        self.find_child_by_name(PROPERTIES70)?
            .find_property_values_by_name("P")
            .find(|v| v.get(0).and_then(|n| n.as_str()) == Some(name))
    }
}

impl Document {
    /// The top-level `Objects` record.
    pub fn objects(&self) -> Option<Node<'_>> {
        self.root().find_child_by_name(OBJECTS)
    }

    /// All `Geometry` records under `Objects`.
    pub fn geometries(&self) -> Vec<Node<'_>> {
        self.objects()
            .map(|o| o.find_children_by_name(GEOMETRY))
            .unwrap_or_default()
    }

    /// Extract every polygon mesh. Geometry records without control points
    /// (curves, shapes without vertices) are skipped.
    pub fn meshes(&self) -> Result<Vec<MeshGeometry>> {
        self.geometries()
            .into_iter()
            .filter(|g| g.find_property_value_by_name(VERTICES).is_some())
            .map(MeshGeometry::from_node)
            .collect()
    }

    /// Object under `Objects` with the given id.
    pub fn object_by_id(&self, id: i64) -> Option<Node<'_>> {
        self.objects()?.children().find(|o| o.object_id() == Some(id))
    }

    /// Decode the `Connections` record. Malformed entries are skipped.
    pub fn connections(&self) -> Vec<Connection> {
        let Some(node) = self.root().find_child_by_name(CONNECTIONS) else {
            return Vec::new();
        };

        node.find_property_values_by_name("C")
            .filter_map(|value| {
                let connection = Connection::from_value(value);
                if connection.is_none() {
                    tracing::warn!(?value, "skipping malformed connection");
                }
                connection
            })
            .collect()
    }

    /// Objects connected below `parent`, in file order.
    pub fn connected_children(&self, parent: i64) -> Vec<Node<'_>> {
        self.connections()
            .iter()
            .filter(|c| c.parent == parent)
            .filter_map(|c| self.object_by_id(c.child))
            .collect()
    }

    /// Objects `child` is connected to, in file order.
    pub fn connected_parents(&self, child: i64) -> Vec<Node<'_>> {
        self.connections()
            .iter()
            .filter(|c| c.child == child)
            .filter_map(|c| self.object_by_id(c.parent))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::PropertyValue;
    use crate::tree::{NodeId, Property};

    fn s(v: &str) -> PropertyValue {
        PropertyValue::String(v.into())
    }

    fn scene() -> Document {
        let mut doc = Document::new(7500);
        let objects = doc.add_child(NodeId::ROOT, OBJECTS.into(), vec![]);
        let model = doc.add_child(objects, "Model".into(), vec![
            PropertyValue::Int64(100),
            s("Cube\u{0}\u{1}Model"),
            s("Mesh"),
        ]);
        doc.add_child(objects, GEOMETRY.into(), vec![
            PropertyValue::Int64(200),
            s("Cube\u{0}\u{1}Geometry"),
            s("Mesh"),
        ]);

        let p70 = doc.add_child(model, PROPERTIES70.into(), vec![]);
        for (name, x) in [("Lcl Translation", 1.0), ("Lcl Scaling", 2.0)] {
            doc.add_property(p70, Property {
                name: "P".into(),
                value: Value::List(vec![
                    s(name),
                    s(name),
                    s(""),
                    s("A"),
                    PropertyValue::Float64(x),
                    PropertyValue::Float64(x),
                    PropertyValue::Float64(x),
                ]),
            });
        }

        let connections = doc.add_child(NodeId::ROOT, CONNECTIONS.into(), vec![]);
        let entries = [
            Value::List(vec![s("OO"), PropertyValue::Int64(100), PropertyValue::Int64(0)]),
            Value::List(vec![s("OO"), PropertyValue::Int64(200), PropertyValue::Int64(100)]),
            Value::List(vec![s("OP"), PropertyValue::Int64(300), PropertyValue::Int64(100), s("DiffuseColor")]),
            Value::Single(s("broken")),
        ];
        for value in entries {
            doc.add_property(connections, Property { name: "C".into(), value });
        }
        doc
    }

    #[test]
    fn test_object_lookup() {
        let doc = scene();
        assert_eq!(doc.objects().unwrap().num_children(), 2);
        assert_eq!(doc.geometries().len(), 1);

        let model = doc.object_by_id(100).unwrap();
        assert_eq!(model.name(), "Model");
        assert_eq!(object_name(model), Some("Cube"));
        assert!(doc.object_by_id(999).is_none());
    }

    #[test]
    fn test_connections() {
        let doc = scene();
        let connections = doc.connections();
        assert_eq!(connections.len(), 3);
        assert!(connections[0].is_object_object());
        assert_eq!(connections[1], Connection {
            kind: "OO".into(),
            child: 200,
            parent: 100,
            property: None,
        });
        assert!(connections[2].is_object_property());
        assert_eq!(connections[2].property.as_deref(), Some("DiffuseColor"));

        let children = doc.connected_children(100);
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name(), GEOMETRY);

        let parents = doc.connected_parents(200);
        assert_eq!(parents[0].object_id(), Some(100));
    }

    #[test]
    fn test_find_p70() {
        let doc = scene();
        let model = doc.object_by_id(100).unwrap();

        let scaling = model.find_p70("Lcl Scaling").unwrap();
        assert_eq!(scaling.get(4).and_then(|v| v.as_f64()), Some(2.0));
        assert!(model.find_p70("Lcl Rotation").is_none());

        let geometry = doc.object_by_id(200).unwrap();
        assert!(geometry.find_p70("Lcl Scaling").is_none());
    }

    #[test]
    fn test_meshes_skip_geometry_without_vertices() {
        let doc = scene();
        assert!(doc.meshes().unwrap().is_empty());
    }
}
