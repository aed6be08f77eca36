//! Borrowed views over the elements stored in a [`Graph`].
//!
//! Every element lives in the graph's arena and is addressed by a typed index
//! ([`NodeId`], [`TypeId`], [`EdgeId`]). The view types pair an index with the
//! graph it belongs to, so navigation (`parent`, `children`, `supers`, edge
//! endpoints) never needs shared ownership.

use std::{collections::HashSet, fmt};

use crate::{
    attribute::{self, Attribute, AttributeValue},
    graph::Graph,
};

/// Index of a node in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Index of a type in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

/// Index of an edge in its graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct TypeData {
    pub(crate) name: String,
    pub(crate) supers: Vec<TypeId>,
    pub(crate) attributes: Vec<Attribute>,
}

#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) name: String,
    pub(crate) kind: Option<TypeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) parent: Option<NodeId>,
}

#[derive(Debug)]
pub(crate) struct EdgeData {
    pub(crate) source: Option<NodeId>,
    pub(crate) target: Option<NodeId>,
    pub(crate) kind: Option<TypeId>,
    pub(crate) source_ref: String,
    pub(crate) target_ref: String,
    pub(crate) owner: Option<NodeId>,
}

/// A node of the architecture graph.
#[derive(Clone, Copy)]
pub struct Node<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> Node<'g> {
    pub(crate) fn new(graph: &'g Graph, id: NodeId) -> Self {
        Self { graph, id }
    }

    fn data(&self) -> &'g NodeData {
        self.graph.node_data(self.id)
    }

    /// Get the arena index of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the bare node name.
    pub fn name(&self) -> &'g str {
        &self.data().name
    }

    /// Get the resolved kind, or `None` if the node is untyped or its kind
    /// reference did not resolve.
    pub fn kind(&self) -> Option<Type<'g>> {
        self.data().kind.map(|id| Type::new(self.graph, id))
    }

    /// Get the enclosing node, or `None` for top-level nodes.
    pub fn parent(&self) -> Option<Node<'g>> {
        self.data().parent.map(|id| Node::new(self.graph, id))
    }

    /// Iterate the direct children in declaration order.
    pub fn children(&self) -> impl ExactSizeIterator<Item = Node<'g>> + 'g {
        let graph = self.graph;
        self.data()
            .children
            .iter()
            .map(move |id| Node::new(graph, *id))
    }

    /// Iterate the edges declared inside this node's block.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge<'g>> + 'g {
        let graph = self.graph;
        self.data()
            .edges
            .iter()
            .map(move |id| Edge::new(graph, *id))
    }

    /// Borrow the node's attributes in declaration order.
    pub fn attributes(&self) -> &'g [Attribute] {
        &self.data().attributes
    }

    /// Get the value of the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&'g AttributeValue> {
        attribute::find_attribute(self.attributes(), name)
    }

    /// Compute the dot-separated name from the outermost ancestor down to
    /// this node, e.g. `Parent.Child`.
    pub fn qualified_name(&self) -> String {
        let mut segments = vec![self.name()];
        let mut current = self.parent();
        while let Some(node) = current {
            segments.push(node.name());
            current = node.parent();
        }
        segments.reverse();
        segments.join(".")
    }

    /// Collect every descendant in pre-order.
    pub fn descendants(&self) -> Vec<Node<'g>> {
        let mut result = Vec::new();
        for child in self.children() {
            result.push(child);
            result.extend(child.descendants());
        }
        result
    }

    /// Collect the edges declared in this node followed by those declared in
    /// its descendants, in pre-order.
    pub fn all_edges(&self) -> Vec<Edge<'g>> {
        let mut result: Vec<Edge<'g>> = self.edges().collect();
        for child in self.children() {
            result.extend(child.all_edges());
        }
        result
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

/// Renders as `Kind Name`, or just `Name` when the kind is absent.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{} {}", kind.name(), self.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// A nominal type with optional supertypes.
#[derive(Clone, Copy)]
pub struct Type<'g> {
    graph: &'g Graph,
    id: TypeId,
}

impl<'g> Type<'g> {
    pub(crate) fn new(graph: &'g Graph, id: TypeId) -> Self {
        Self { graph, id }
    }

    fn data(&self) -> &'g TypeData {
        self.graph.type_data(self.id)
    }

    /// Get the arena index of this type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Get the type name.
    pub fn name(&self) -> &'g str {
        &self.data().name
    }

    /// Iterate the resolved supertypes in declaration order.
    pub fn supers(&self) -> impl ExactSizeIterator<Item = Type<'g>> + 'g {
        let graph = self.graph;
        self.data()
            .supers
            .iter()
            .map(move |id| Type::new(graph, *id))
    }

    /// Borrow the type's attributes in declaration order.
    pub fn attributes(&self) -> &'g [Attribute] {
        &self.data().attributes
    }

    /// Get the value of the first attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&'g AttributeValue> {
        attribute::find_attribute(self.attributes(), name)
    }

    /// Check whether any direct or transitive supertype is named `name`.
    ///
    /// The walk tracks visited types, so it terminates on cyclic supertype
    /// chains. A type only extends itself through such a cycle.
    pub fn extends(&self, name: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<TypeId> = self.data().supers.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let data = self.graph.type_data(id);
            if data.name == name {
                return true;
            }
            stack.extend(data.supers.iter().rev().copied());
        }
        false
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for Type<'_> {}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

/// Renders as `type Name` or `type Name : Super1, Super2`.
impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {}", self.name())?;
        let supers: Vec<&str> = self.supers().map(|s| s.name()).collect();
        if !supers.is_empty() {
            write!(f, " : {}", supers.join(", "))?;
        }
        Ok(())
    }
}

/// A directed edge between two nodes.
///
/// Endpoints and kind are `None` when their reference did not resolve; the
/// raw reference text is always kept.
#[derive(Clone, Copy)]
pub struct Edge<'g> {
    graph: &'g Graph,
    id: EdgeId,
}

impl<'g> Edge<'g> {
    pub(crate) fn new(graph: &'g Graph, id: EdgeId) -> Self {
        Self { graph, id }
    }

    fn data(&self) -> &'g EdgeData {
        self.graph.edge_data(self.id)
    }

    /// Get the arena index of this edge.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Get the resolved source node.
    pub fn source(&self) -> Option<Node<'g>> {
        self.data().source.map(|id| Node::new(self.graph, id))
    }

    /// Get the resolved target node.
    pub fn target(&self) -> Option<Node<'g>> {
        self.data().target.map(|id| Node::new(self.graph, id))
    }

    /// Get the resolved edge kind.
    pub fn kind(&self) -> Option<Type<'g>> {
        self.data().kind.map(|id| Type::new(self.graph, id))
    }

    /// Get the source reference exactly as written, e.g. `Parent.Child1`.
    pub fn source_ref(&self) -> &'g str {
        &self.data().source_ref
    }

    /// Get the target reference exactly as written.
    pub fn target_ref(&self) -> &'g str {
        &self.data().target_ref
    }

    /// Get the node whose block declared this edge, or `None` for top-level
    /// edges.
    pub fn owner(&self) -> Option<Node<'g>> {
        self.data().owner.map(|id| Node::new(self.graph, id))
    }

    /// Returns `true` when both endpoints resolved.
    pub fn is_resolved(&self) -> bool {
        self.data().source.is_some() && self.data().target.is_some()
    }
}

impl PartialEq for Edge<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for Edge<'_> {}

impl fmt::Debug for Edge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("id", &self.id)
            .field("source_ref", &self.source_ref())
            .field("target_ref", &self.target_ref())
            .finish()
    }
}

/// Renders as `source -> target` or `source -> target : Kind`, falling back
/// to the raw reference text for unresolved endpoints.
impl fmt::Display for Edge<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = self.source().map_or(self.source_ref(), |n| n.name());
        let target = self.target().map_or(self.target_ref(), |n| n.name());
        write!(f, "{source} -> {target}")?;
        if let Some(kind) = self.kind() {
            write!(f, " : {}", kind.name())?;
        }
        Ok(())
    }
}
