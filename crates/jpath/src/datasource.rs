//! The navigation contract the evaluator is written against.
use jxt_tree::{Node, NodeType, Scalar};

/// A node in a read-only JSON tree.
///
/// `'a` is the lifetime of the underlying document. Handles are cheap copies;
/// equality is identity (same node of the same document), while
/// [`JsonNode::deep_eq`] compares structure.
pub trait JsonNode<'a>: std::fmt::Debug + Clone + Copy + PartialEq + Eq {
    fn node_type(&self) -> NodeType;

    /// The scalar of a value node; `None` for objects and arrays.
    fn scalar(&self) -> Option<&'a Scalar>;

    /// Children in document order: object members in insertion order, array
    /// elements by index.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    fn child_by_name(&self, name: &str) -> Option<Self>;

    fn child_at(&self, index: usize) -> Option<Self>;

    fn parent(&self) -> Option<Self>;

    fn root(&self) -> Self {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    fn deep_eq(&self, other: &Self) -> bool;
}

impl<'a> JsonNode<'a> for Node<'a> {
    fn node_type(&self) -> NodeType {
        Node::node_type(self)
    }

    fn scalar(&self) -> Option<&'a Scalar> {
        Node::scalar(self)
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        Box::new(Node::children(self))
    }

    fn child_by_name(&self, name: &str) -> Option<Self> {
        Node::child_by_name(self, name)
    }

    fn child_at(&self, index: usize) -> Option<Self> {
        Node::child_at(self, index)
    }

    fn parent(&self) -> Option<Self> {
        Node::parent(self)
    }

    fn root(&self) -> Self {
        Node::root(self)
    }

    fn deep_eq(&self, other: &Self) -> bool {
        Node::deep_eq(self, *other)
    }
}
