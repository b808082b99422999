//! The document arena and the borrowed [`Node`] handle.
use crate::error::TreeError;
use crate::scalar::Scalar;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An index into a [`Document`]'s arena. Only meaningful for the document that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Object,
    Array,
    Value,
}

#[derive(Debug, Clone)]
pub(crate) enum Content {
    Object(IndexMap<String, NodeId>),
    Array(Vec<NodeId>),
    Value(Scalar),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    /// Field name when the node is an object member.
    pub(crate) name: Option<String>,
    pub(crate) content: Content,
}

/// An owned JSON tree.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]. Each
/// child holds the id of its parent; the parent owns the child's slot. Nodes
/// that are created but never attached, or that are removed, stay in the
/// arena but are unreachable from the root.
#[derive(Clone)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) root: NodeId,
}

impl Default for Document {
    /// A document whose root is the `null` value.
    fn default() -> Self {
        Document::value(Scalar::Null)
    }
}

impl Document {
    fn with_root(content: Content) -> Self {
        Document {
            nodes: vec![NodeData {
                parent: None,
                name: None,
                content,
            }],
            root: NodeId(0),
        }
    }

    /// An empty arena whose root must be set before the document is handed
    /// out. Used by the parser, which allocates the root as its first node.
    pub(crate) fn unrooted() -> Self {
        Document {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn object() -> Self {
        Document::with_root(Content::Object(IndexMap::new()))
    }

    pub fn array() -> Self {
        Document::with_root(Content::Array(Vec::new()))
    }

    pub fn value(value: impl Into<Scalar>) -> Self {
        Document::with_root(Content::Value(value.into()))
    }

    pub fn root(&self) -> Node<'_> {
        self.node(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { doc: self, id }
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    pub(crate) fn alloc(&mut self, content: Content) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            name: None,
            content,
        });
        id
    }

    pub fn create_object(&mut self) -> NodeId {
        self.alloc(Content::Object(IndexMap::new()))
    }

    pub fn create_array(&mut self) -> NodeId {
        self.alloc(Content::Array(Vec::new()))
    }

    pub fn create_value(&mut self, value: impl Into<Scalar>) -> NodeId {
        self.alloc(Content::Value(value.into()))
    }

    /// Checks that `child` can be attached below `parent`: it must be
    /// detached, must not be the root, and must not be `parent` itself or one
    /// of its ancestors.
    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if self.data(child).parent.is_some() || child == self.root {
            return Err(TreeError::AlreadyAttached(child));
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(TreeError::WouldCycle(child));
            }
            cursor = self.data(id).parent;
        }
        Ok(())
    }

    /// Sets `name` on `object` to `child`. An existing field of the same name is
    /// replaced in place, keeping its position, and the detached previous child
    /// is returned.
    pub fn insert_field(
        &mut self,
        object: NodeId,
        name: impl Into<String>,
        child: NodeId,
    ) -> Result<Option<NodeId>, TreeError> {
        if !matches!(self.data(object).content, Content::Object(_)) {
            return Err(TreeError::NotAnObject(object));
        }
        self.check_attachable(object, child)?;

        let name = name.into();
        let previous = match &mut self.data_mut(object).content {
            Content::Object(fields) => fields.insert(name.clone(), child),
            _ => None,
        };
        if let Some(old) = previous {
            let old_data = self.data_mut(old);
            old_data.parent = None;
            old_data.name = None;
        }
        let data = self.data_mut(child);
        data.parent = Some(object);
        data.name = Some(name);
        Ok(previous)
    }

    pub fn remove_field(&mut self, object: NodeId, name: &str) -> Result<Option<NodeId>, TreeError> {
        let removed = match &mut self.data_mut(object).content {
            Content::Object(fields) => fields.shift_remove(name),
            _ => return Err(TreeError::NotAnObject(object)),
        };
        if let Some(id) = removed {
            let data = self.data_mut(id);
            data.parent = None;
            data.name = None;
        }
        Ok(removed)
    }

    pub fn push_element(&mut self, array: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.element_count(array)?;
        self.insert_element(array, len, child)
    }

    /// Inserts `child` at `index`, shifting later elements (and their derived
    /// keys) up by one.
    pub fn insert_element(&mut self, array: NodeId, index: usize, child: NodeId) -> Result<(), TreeError> {
        let len = self.element_count(array)?;
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.check_attachable(array, child)?;
        if let Content::Array(elements) = &mut self.data_mut(array).content {
            elements.insert(index, child);
        }
        self.data_mut(child).parent = Some(array);
        Ok(())
    }

    pub fn remove_element(&mut self, array: NodeId, index: usize) -> Result<NodeId, TreeError> {
        let len = self.element_count(array)?;
        if index >= len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let removed = match &mut self.data_mut(array).content {
            Content::Array(elements) => elements.remove(index),
            _ => return Err(TreeError::NotAnArray(array)),
        };
        self.data_mut(removed).parent = None;
        Ok(removed)
    }

    fn element_count(&self, array: NodeId) -> Result<usize, TreeError> {
        match &self.data(array).content {
            Content::Array(elements) => Ok(elements.len()),
            _ => Err(TreeError::NotAnArray(array)),
        }
    }

    /// Replaces the scalar held by a value node.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<Scalar>) -> Result<(), TreeError> {
        match &mut self.data_mut(id).content {
            Content::Value(slot) => {
                *slot = value.into();
                Ok(())
            }
            _ => Err(TreeError::NotAValue(id)),
        }
    }

    /// Makes a detached node the new root. The previous root becomes
    /// unreachable.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id != self.root && self.data(id).parent.is_some() {
            return Err(TreeError::AlreadyAttached(id));
        }
        self.root = id;
        Ok(())
    }

    /// Deep-copies `source` (typically from another document) into this arena
    /// and returns the detached copy.
    pub fn import(&mut self, source: Node<'_>) -> NodeId {
        match &source.data().content {
            Content::Value(value) => self.alloc(Content::Value(value.clone())),
            Content::Array(elements) => {
                let copies: Vec<NodeId> = elements
                    .iter()
                    .map(|&child| self.import(source.doc.node(child)))
                    .collect();
                for &copy in &copies {
                    self.data_mut(copy).parent = Some(NodeId(self.nodes.len()));
                }
                self.alloc(Content::Array(copies))
            }
            Content::Object(fields) => {
                let mut copies = IndexMap::with_capacity(fields.len());
                for (name, &child) in fields {
                    let copy = self.import(source.doc.node(child));
                    self.data_mut(copy).name = Some(name.clone());
                    copies.insert(name.clone(), copy);
                }
                let parent = NodeId(self.nodes.len());
                for &copy in copies.values() {
                    self.data_mut(copy).parent = Some(parent);
                }
                self.alloc(Content::Object(copies))
            }
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.root().deep_eq(other.root())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({})", self.root().to_json())
    }
}

/// A borrowed handle to one node of a [`Document`].
///
/// Handles compare equal when they point at the same node of the same
/// document; use [`Node::deep_eq`] for structural equality.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    pub(crate) doc: &'a Document,
    pub(crate) id: NodeId,
}

impl<'a> Node<'a> {
    pub(crate) fn data(&self) -> &'a NodeData {
        self.doc.data(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node_type(&self) -> NodeType {
        match self.data().content {
            Content::Object(_) => NodeType::Object,
            Content::Array(_) => NodeType::Array,
            Content::Value(_) => NodeType::Value,
        }
    }

    pub fn is_object(&self) -> bool {
        self.node_type() == NodeType::Object
    }

    pub fn is_array(&self) -> bool {
        self.node_type() == NodeType::Array
    }

    pub fn scalar(&self) -> Option<&'a Scalar> {
        match &self.data().content {
            Content::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| self.doc.node(id))
    }

    /// The topmost ancestor. For attached nodes this is the document root.
    pub fn root(&self) -> Node<'a> {
        let mut current = *self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// The field name when this node is an object member.
    pub fn name(&self) -> Option<&'a str> {
        self.data().name.as_deref()
    }

    /// The position when this node is an array element.
    pub fn index(&self) -> Option<usize> {
        let parent = self.parent()?;
        match &parent.data().content {
            Content::Array(elements) => elements.iter().position(|&id| id == self.id),
            _ => None,
        }
    }

    /// The key of this node within its parent: the field name for object
    /// members and the stringified index for array elements. The root has none.
    pub fn key(&self) -> Option<String> {
        match self.name() {
            Some(name) => Some(name.to_string()),
            None => self.index().map(|i| i.to_string()),
        }
    }

    /// The keys from the root down to this node. Empty for the root.
    pub fn path(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut current = *self;
        while let Some(key) = current.key() {
            keys.push(key);
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        keys.reverse();
        keys
    }

    pub fn children(&self) -> Children<'a> {
        let inner = match &self.data().content {
            Content::Object(fields) => ChildIds::Fields(fields.values()),
            Content::Array(elements) => ChildIds::Elements(elements.iter()),
            Content::Value(_) => ChildIds::Empty,
        };
        Children { doc: self.doc, inner }
    }

    pub fn child_count(&self) -> usize {
        match &self.data().content {
            Content::Object(fields) => fields.len(),
            Content::Array(elements) => elements.len(),
            Content::Value(_) => 0,
        }
    }

    /// The object member called `name`. `None` for arrays and values.
    pub fn child_by_name(&self, name: &str) -> Option<Node<'a>> {
        match &self.data().content {
            Content::Object(fields) => fields.get(name).map(|&id| self.doc.node(id)),
            _ => None,
        }
    }

    /// The child at `index`: array elements by position and object members by
    /// insertion order.
    pub fn child_at(&self, index: usize) -> Option<Node<'a>> {
        let id = match &self.data().content {
            Content::Object(fields) => fields.get_index(index).map(|(_, &id)| id),
            Content::Array(elements) => elements.get(index).copied(),
            Content::Value(_) => None,
        };
        id.map(|id| self.doc.node(id))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'a str> + use<'a> {
        self.fields().map(|(name, _)| name)
    }

    /// `(name, member)` pairs of an object in insertion order; empty otherwise.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, Node<'a>)> + use<'a> {
        let doc = self.doc;
        let fields = match &self.data().content {
            Content::Object(fields) => Some(fields),
            _ => None,
        };
        fields
            .into_iter()
            .flat_map(move |fields| fields.iter().map(move |(name, &id)| (name.as_str(), doc.node(id))))
    }

    /// Structural equality: same kind, scalars equal by tag and value, arrays
    /// element-wise in order, objects member-wise by name regardless of order.
    pub fn deep_eq(&self, other: Node<'_>) -> bool {
        match (&self.data().content, &other.data().content) {
            (Content::Value(a), Content::Value(b)) => a == b,
            (Content::Array(a), Content::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(&x, &y)| self.doc.node(x).deep_eq(other.doc.node(y)))
            }
            (Content::Object(a), Content::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(name, &x)| {
                        b.get(name)
                            .is_some_and(|&y| self.doc.node(x).deep_eq(other.doc.node(y)))
                    })
            }
            _ => false,
        }
    }

    /// A detached deep copy as a standalone document.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::unrooted();
        doc.root = doc.import(*self);
        doc
    }

    /// The node's string form: string values without quotes, everything else
    /// as compact JSON.
    pub fn to_text(&self) -> String {
        match self.scalar() {
            Some(Scalar::String(s)) => s.clone(),
            _ => self.to_json(),
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.doc, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("type", &self.node_type())
            .field("path", &self.path())
            .finish()
    }
}

enum ChildIds<'a> {
    Fields(indexmap::map::Values<'a, String, NodeId>),
    Elements(std::slice::Iter<'a, NodeId>),
    Empty,
}

/// Iterator over the children of a node, in document order.
pub struct Children<'a> {
    doc: &'a Document,
    inner: ChildIds<'a>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = match &mut self.inner {
            ChildIds::Fields(it) => it.next().copied(),
            ChildIds::Elements(it) => it.next().copied(),
            ChildIds::Empty => None,
        };
        id.map(|id| self.doc.node(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            ChildIds::Fields(it) => it.size_hint(),
            ChildIds::Elements(it) => it.size_hint(),
            ChildIds::Empty => (0, Some(0)),
        }
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = match &mut self.inner {
            ChildIds::Fields(it) => it.next_back().copied(),
            ChildIds::Elements(it) => it.next_back().copied(),
            ChildIds::Empty => None,
        };
        id.map(|id| self.doc.node(id))
    }
}

impl ExactSizeIterator for Children<'_> {}
