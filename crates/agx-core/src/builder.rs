//! Incremental construction of a [`Graph`].
//!
//! The builder hands out arena indices as elements are added, so callers can
//! create every element first and wire references afterwards. Indices are
//! only meaningful for the builder that produced them.

use log::debug;

use crate::{
    attribute::Attribute,
    element::{EdgeData, EdgeId, NodeData, NodeId, TypeData, TypeId},
    graph::Graph,
};

/// Resolved endpoints and kind of an edge being added.
///
/// Any field may be `None` when the corresponding reference did not resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeLinks {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
    pub kind: Option<TypeId>,
}

/// Builder for an immutable [`Graph`].
///
/// # Panics
///
/// Methods taking an index panic if it was not produced by this builder.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type with no supertypes.
    pub fn add_type(&mut self, name: impl Into<String>, attributes: Vec<Attribute>) -> TypeId {
        let id = TypeId(self.graph.types.len());
        self.graph.types.push(TypeData {
            name: name.into(),
            supers: Vec::new(),
            attributes,
        });
        id
    }

    /// Append `super_type` to the supertypes of `ty`.
    pub fn add_super(&mut self, ty: TypeId, super_type: TypeId) {
        assert!(super_type.0 < self.graph.types.len(), "unknown type index");
        self.graph.types[ty.0].supers.push(super_type);
    }

    /// Add a node under `parent`, or at the top level when `parent` is `None`.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        kind: Option<TypeId>,
        attributes: Vec<Attribute>,
        parent: Option<NodeId>,
    ) -> NodeId {
        if let Some(kind) = kind {
            assert!(kind.0 < self.graph.types.len(), "unknown type index");
        }

        let id = NodeId(self.graph.nodes.len());
        match parent {
            Some(parent) => self.graph.nodes[parent.0].children.push(id),
            None => self.graph.root_nodes.push(id),
        }
        self.graph.nodes.push(NodeData {
            name: name.into(),
            kind,
            children: Vec::new(),
            edges: Vec::new(),
            attributes,
            parent,
        });
        id
    }

    /// Add an edge declared inside `owner`'s block, or at the top level when
    /// `owner` is `None`.
    pub fn add_edge(
        &mut self,
        owner: Option<NodeId>,
        links: EdgeLinks,
        source_ref: impl Into<String>,
        target_ref: impl Into<String>,
    ) -> EdgeId {
        let id = EdgeId(self.graph.edges.len());
        match owner {
            Some(owner) => self.graph.nodes[owner.0].edges.push(id),
            None => self.graph.root_edges.push(id),
        }
        self.graph.edges.push(EdgeData {
            source: links.source,
            target: links.target,
            kind: links.kind,
            source_ref: source_ref.into(),
            target_ref: target_ref.into(),
            owner,
        });
        id
    }

    /// Add a document-level attribute.
    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.graph.attributes.push(attribute);
    }

    /// Finish building and return the graph.
    pub fn build(self) -> Graph {
        debug!(
            types = self.graph.types.len(),
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len();
            "Graph built",
        );
        self.graph
    }
}
