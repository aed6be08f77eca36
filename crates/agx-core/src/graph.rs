//! The immutable architecture graph and its query facade.

use std::fmt;

use crate::{
    attribute::{self, Attribute, AttributeValue},
    element::{Edge, EdgeData, EdgeId, Node, NodeData, NodeId, Type, TypeData, TypeId},
};

/// An architecture graph: types, a tree of nodes, edges, and document-level
/// attributes.
///
/// The graph owns every element in flat arenas. It is created through
/// [`GraphBuilder`](crate::GraphBuilder) and never changes afterwards, so it
/// can be shared freely across threads.
#[derive(Debug, Default)]
pub struct Graph {
    pub(crate) types: Vec<TypeData>,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) edges: Vec<EdgeData>,
    pub(crate) root_nodes: Vec<NodeId>,
    pub(crate) root_edges: Vec<EdgeId>,
    pub(crate) attributes: Vec<Attribute>,
}

impl Graph {
    pub(crate) fn type_data(&self, id: TypeId) -> &TypeData {
        &self.types[id.0]
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn edge_data(&self, id: EdgeId) -> &EdgeData {
        &self.edges[id.0]
    }

    /// Returns `true` if the graph has no types, nodes, edges, or attributes.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.nodes.is_empty()
            && self.edges.is_empty()
            && self.attributes.is_empty()
    }

    /// Iterate every declared type in declaration order.
    pub fn types(&self) -> impl ExactSizeIterator<Item = Type<'_>> {
        (0..self.types.len()).map(move |index| Type::new(self, TypeId(index)))
    }

    /// Iterate the top-level nodes in declaration order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = Node<'_>> {
        self.root_nodes.iter().map(move |id| Node::new(self, *id))
    }

    /// Iterate the top-level edges in declaration order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge<'_>> {
        self.root_edges.iter().map(move |id| Edge::new(self, *id))
    }

    /// Borrow the document-level attributes in declaration order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Get the value of the first document-level attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        attribute::find_attribute(&self.attributes, name)
    }

    /// Look up a node by arena index.
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then(|| Node::new(self, id))
    }

    /// Look up a type by arena index.
    pub fn type_by_id(&self, id: TypeId) -> Option<Type<'_>> {
        (id.0 < self.types.len()).then(|| Type::new(self, id))
    }

    /// Look up an edge by arena index.
    pub fn edge(&self, id: EdgeId) -> Option<Edge<'_>> {
        (id.0 < self.edges.len()).then(|| Edge::new(self, id))
    }

    /// Collect every node in the graph in pre-order: each top-level node
    /// followed by its descendants.
    pub fn all_nodes(&self) -> Vec<Node<'_>> {
        let mut result = Vec::with_capacity(self.nodes.len());
        for node in self.nodes() {
            result.push(node);
            result.extend(node.descendants());
        }
        result
    }

    /// Collect every edge in the graph: top-level edges first, then the edges
    /// of each top-level node and its descendants in pre-order.
    pub fn all_edges(&self) -> Vec<Edge<'_>> {
        let mut result: Vec<Edge<'_>> = self.edges().collect();
        for node in self.nodes() {
            result.extend(node.all_edges());
        }
        result
    }

    /// Find the first node named `name` in pre-order.
    pub fn find_node(&self, name: &str) -> Option<Node<'_>> {
        self.all_nodes().into_iter().find(|node| node.name() == name)
    }

    /// Find a node by its dot-separated qualified name, e.g. `Parent.Child`.
    pub fn find_node_by_path(&self, path: &str) -> Option<Node<'_>> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.nodes().find(|node| node.name() == first)?;
        for segment in segments {
            current = current.children().find(|child| child.name() == segment)?;
        }
        Some(current)
    }

    /// Find the first type named `name`.
    pub fn find_type(&self, name: &str) -> Option<Type<'_>> {
        self.types().find(|ty| ty.name() == name)
    }

    /// Collect every node whose resolved kind is named `kind`, in pre-order.
    pub fn find_nodes_by_kind(&self, kind: &str) -> Vec<Node<'_>> {
        self.all_nodes()
            .into_iter()
            .filter(|node| node.kind().is_some_and(|ty| ty.name() == kind))
            .collect()
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("  ")?;
    }
    Ok(())
}

fn write_node(f: &mut fmt::Formatter<'_>, node: Node<'_>, depth: usize) -> fmt::Result {
    write_indent(f, depth)?;
    write!(f, "{node}")?;

    let has_body =
        !node.attributes().is_empty() || node.children().len() > 0 || node.edges().len() > 0;
    if !has_body {
        return writeln!(f);
    }

    writeln!(f, " {{")?;
    for attr in node.attributes() {
        write_indent(f, depth + 1)?;
        writeln!(f, "{attr}")?;
    }
    for child in node.children() {
        write_node(f, child, depth + 1)?;
    }
    for edge in node.edges() {
        write_indent(f, depth + 1)?;
        writeln!(f, "{edge}")?;
    }
    write_indent(f, depth)?;
    writeln!(f, "}}")
}

/// Renders an indented outline: types, then the node tree, then top-level
/// edges, then document attributes.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ty in self.types() {
            writeln!(f, "{ty}")?;
        }
        for node in self.nodes() {
            write_node(f, node, 0)?;
        }
        for edge in self.edges() {
            writeln!(f, "{edge}")?;
        }
        for attr in self.attributes() {
            writeln!(f, "{attr}")?;
        }
        Ok(())
    }
}
