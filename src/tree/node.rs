//! Read-only record handles and property lookups.

use super::document::{Document, NodeId, NodeRecord};
use crate::binary::PropertyValue;

/// Value of a leaf property.
///
/// A leaf record with a single value is stored as [`Value::Single`]; one that
/// declared several keeps them all, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Single(PropertyValue),
    List(Vec<PropertyValue>),
}

impl Value {
    /// Build from the values of one leaf record (must not be empty).
    pub(crate) fn from_values(mut values: Vec<PropertyValue>) -> Self {
        if values.len() == 1 {
            Self::Single(values.remove(0))
        } else {
            Self::List(values)
        }
    }

    /// All values as a slice.
    pub fn as_slice(&self) -> &[PropertyValue] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::List(v) => v,
        }
    }

    /// The value at `index`.
    pub fn get(&self, index: usize) -> Option<&PropertyValue> {
        self.as_slice().get(index)
    }

    /// The lone value of a single-valued property.
    pub fn as_single(&self) -> Option<&PropertyValue> {
        match self {
            Self::Single(v) => Some(v),
            Self::List(_) => None,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named leaf record attached to its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

/// Borrowed handle to one record of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    #[inline]
    fn record(&self) -> &'a NodeRecord {
        self.doc.record(self.id)
    }

    /// Arena id of this record.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The owning document.
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Record name; empty for the root.
    #[inline]
    pub fn name(&self) -> &'a str {
        &self.record().name
    }

    /// Values declared on the record header itself.
    #[inline]
    pub fn attributes(&self) -> &'a [PropertyValue] {
        &self.record().attributes
    }

    /// Leaf properties, in file order.
    #[inline]
    pub fn properties(&self) -> &'a [Property] {
        &self.record().properties
    }

    #[inline]
    pub fn num_children(&self) -> usize {
        self.record().children.len()
    }

    /// Child at `index`, in file order.
    pub fn child(&self, index: usize) -> Option<Node<'a>> {
        let doc = self.doc;
        self.record().children.get(index).map(|&id| Node::new(doc, id))
    }

    /// Child records, in file order.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        self.record().children.iter().map(move |&id| Node::new(doc, id))
    }

    /// The enclosing record, `None` for the root.
    pub fn parent(&self) -> Option<Node<'a>> {
        self.record().parent.map(|id| Node::new(self.doc, id))
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.record().parent.is_none()
    }

    /// Nesting depth; the root is 0.
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), |n| n.parent()).count()
    }

    /// Slash-separated names from the root down to this record.
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = std::iter::successors(Some(*self), |n| n.parent())
            .filter(|n| !n.is_root())
            .map(|n| n.name())
            .collect();
        names.reverse();
        format!("/{}", names.join("/"))
    }

    /// First direct child named `name`.
    pub fn find_child_by_name(&self, name: &str) -> Option<Node<'a>> {
        self.children().find(|c| c.name() == name)
    }

    /// All direct children named `name`, in file order.
    pub fn find_children_by_name(&self, name: &str) -> Vec<Node<'a>> {
        self.children().filter(|c| c.name() == name).collect()
    }

    /// Value of the first property named `name`.
    pub fn find_property_value_by_name(&self, name: &str) -> Option<&'a Value> {
        self.properties()
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Values of every property named `name`, in file order.
    pub fn find_property_values_by_name<'n>(
        &self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Value> + 'n
    where
        'a: 'n,
    {
        self.properties()
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| &p.value)
    }

    /// Compare names, attributes, properties and children recursively,
    /// ignoring which document (and so which format version) they came from.
    pub fn structurally_eq(&self, other: &Node<'_>) -> bool {
        self.name() == other.name()
            && self.attributes() == other.attributes()
            && self.properties() == other.properties()
            && self.num_children() == other.num_children()
            && self
                .children()
                .zip(other.children())
                .all(|(a, b)| a.structurally_eq(&b))
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("attributes", &self.attributes().len())
            .field("properties", &self.properties().len())
            .field("children", &self.num_children())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new(7400);
        let objects = doc.add_child(NodeId::ROOT, "Objects".into(), vec![]);
        let a = doc.add_child(objects, "Model".into(), vec![PropertyValue::Int64(1)]);
        doc.add_child(objects, "Geometry".into(), vec![PropertyValue::Int64(2)]);
        doc.add_child(objects, "Model".into(), vec![PropertyValue::Int64(3)]);
        doc.add_property(a, Property {
            name: "Version".into(),
            value: Value::from_values(vec![PropertyValue::Int32(232)]),
        });
        doc.add_property(a, Property {
            name: "P".into(),
            value: Value::from_values(vec![
                PropertyValue::String("Lcl Translation".into()),
                PropertyValue::Float64(1.0),
            ]),
        });
        doc.add_property(a, Property {
            name: "P".into(),
            value: Value::from_values(vec![
                PropertyValue::String("Visibility".into()),
                PropertyValue::Float64(0.0),
            ]),
        });
        doc
    }

    #[test]
    fn test_find_children() {
        let doc = sample();
        let objects = doc.root().find_child_by_name("Objects").unwrap();
        assert_eq!(objects.num_children(), 3);

        let models = objects.find_children_by_name("Model");
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].attributes(), &[PropertyValue::Int64(1)]);
        assert_eq!(models[1].attributes(), &[PropertyValue::Int64(3)]);

        assert!(objects.find_child_by_name("Camera").is_none());
        assert!(objects.find_children_by_name("Camera").is_empty());
    }

    #[test]
    fn test_find_property_values() {
        let doc = sample();
        let model = doc.root().child(0).unwrap().child(0).unwrap();

        let version = model.find_property_value_by_name("Version").unwrap();
        assert_eq!(version.as_single(), Some(&PropertyValue::Int32(232)));

        // First match wins
        let p = model.find_property_value_by_name("P").unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.get(0).and_then(|v| v.as_str()), Some("Lcl Translation"));
        assert_eq!(model.find_property_values_by_name("P").count(), 2);
        assert!(model.find_property_value_by_name("Missing").is_none());
    }

    #[test]
    fn test_parent_links() {
        let doc = sample();
        let root = doc.root();
        assert!(root.is_root());
        assert!(root.parent().is_none());

        let model = root.child(0).unwrap().child(2).unwrap();
        assert_eq!(model.depth(), 2);
        assert_eq!(model.parent().unwrap().name(), "Objects");
        assert_eq!(model.path(), "/Objects/Model");
        assert_eq!(root.path(), "/");
    }

    #[test]
    fn test_structurally_eq() {
        let a = sample();
        let b = sample();
        assert!(a.root().structurally_eq(&b.root()));

        let mut c = sample();
        c.add_child(NodeId::ROOT, "Connections".into(), vec![]);
        assert!(!a.root().structurally_eq(&c.root()));
    }
}
