//! Arena holding every decoded record of one file.

use super::node::{Node, Property};
use crate::binary::PropertyValue;

/// Stable index of a record inside its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The synthetic root record.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage for one record. Relations are arena indices, never owning pointers.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeRecord {
    pub(crate) name: String,
    pub(crate) attributes: Vec<PropertyValue>,
    pub(crate) properties: Vec<Property>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

/// A decoded FBX file: format version plus the record tree.
///
/// The tree is built once by [`parse`](crate::binary::parse) and is
/// read-only afterwards. Records are addressed through [`Node`] handles.
#[derive(Clone, Debug)]
pub struct Document {
    version: u32,
    nodes: Vec<NodeRecord>,
}

impl Document {
    /// Create a document holding only the unnamed root.
    pub(crate) fn new(version: u32) -> Self {
        Self {
            version,
            nodes: vec![NodeRecord::default()],
        }
    }

    /// Append a child record under `parent` and return its id.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        name: String,
        attributes: Vec<PropertyValue>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeRecord {
            name,
            attributes,
            properties: Vec::new(),
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Attach a leaf property to `node`.
    pub(crate) fn add_property(&mut self, node: NodeId, property: Property) {
        self.nodes[node.0].properties.push(property);
    }

    /// Parent of `node`, `None` for the root.
    pub(crate) fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    #[inline]
    pub(crate) fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.0]
    }

    /// Format version from the file preamble.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The synthetic root record.
    #[inline]
    pub fn root(&self) -> Node<'_> {
        Node::new(self, NodeId::ROOT)
    }

    /// Look up a record by id.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then(|| Node::new(self, id))
    }

    /// Number of records, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the file held no records at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// All records in file order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len()).map(move |i| Node::new(self, NodeId(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Value;

    #[test]
    fn test_build_tree() {
        let mut doc = Document::new(7500);
        assert!(doc.is_empty());

        let objects = doc.add_child(NodeId::ROOT, "Objects".into(), vec![]);
        let geom = doc.add_child(objects, "Geometry".into(), vec![PropertyValue::Int64(7)]);
        doc.add_property(geom, Property {
            name: "GeometryVersion".into(),
            value: Value::Single(PropertyValue::Int32(124)),
        });

        assert_eq!(doc.len(), 3);
        assert_eq!(doc.parent_of(geom), Some(objects));
        assert_eq!(doc.parent_of(objects), Some(NodeId::ROOT));
        assert_eq!(doc.parent_of(NodeId::ROOT), None);
        assert_eq!(doc.record(objects).children, vec![geom]);
        assert!(doc.node(NodeId(3)).is_none());

        let names: Vec<&str> = doc.nodes().map(|n| n.name()).collect();
        assert_eq!(names, ["", "Objects", "Geometry"]);
    }
}
