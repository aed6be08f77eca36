//! Elaboration of the raw declaration tree into a [`Graph`].
//!
//! Every entity is materialized first and wired afterwards, so forward
//! references between declarations need no placeholders:
//!
//! 1. Types are created with empty supertype lists, then supertypes are
//!    linked in a second pass.
//! 2. Nodes are created depth-first. Each node is registered under its
//!    [`DeclId`] before its children are built.
//! 3. Top-level edges are resolved once the whole tree exists.
//! 4. Edges nested in node blocks are resolved by walking the finished tree
//!    with the chain of enclosing declarations as their scope.
//!
//! Unresolved references never fail here; the affected field is left empty
//! and the raw reference text is kept on the edge.

use std::collections::HashMap;

use log::{debug, info, trace};

use agx_core::{EdgeLinks, Graph, GraphBuilder, NodeId, TypeId};

use crate::{
    attributes::build_attributes,
    link::Linker,
    parser_types::{DeclId, Document, EdgeDecl, NodeDecl},
};

pub(crate) struct Elaborator<'l, 'a, 'src> {
    document: &'a Document<'src>,
    linker: &'l Linker<'a, 'src>,
    builder: GraphBuilder,
    /// Built type per entry of [`Document::types`]
    types: Vec<TypeId>,
    registry: HashMap<DeclId, NodeId>,
}

impl<'l, 'a, 'src> Elaborator<'l, 'a, 'src> {
    pub fn new(document: &'a Document<'src>, linker: &'l Linker<'a, 'src>) -> Self {
        Self {
            document,
            linker,
            builder: GraphBuilder::new(),
            types: Vec::with_capacity(document.types.len()),
            registry: HashMap::new(),
        }
    }

    pub fn build(mut self) -> Graph {
        let document = self.document;

        debug!(count = document.types.len(); "Building types");
        self.build_types();

        debug!(count = document.nodes.len(); "Building node tree");
        self.build_nodes(&document.nodes, None);

        debug!(count = document.edges.len(); "Resolving top-level edges");
        for edge in &document.edges {
            self.build_edge(edge, None, &[]);
        }

        debug!("Resolving nested edges");
        let mut scope = Vec::new();
        self.build_nested_edges(&document.nodes, &mut scope);

        for attribute in build_attributes(&document.attributes) {
            self.builder.add_attribute(attribute);
        }

        let graph = self.builder.build();
        info!(
            types = graph.types().len(),
            nodes = graph.all_nodes().len(),
            edges = graph.all_edges().len();
            "Graph elaboration completed",
        );
        graph
    }

    fn build_types(&mut self) {
        for decl in &self.document.types {
            let id = self
                .builder
                .add_type(*decl.name.inner(), build_attributes(&decl.attributes));
            self.types.push(id);
        }

        for (decl, &ty) in self.document.types.iter().zip(&self.types) {
            for super_ref in &decl.supers {
                match self.resolve_type(super_ref.inner()) {
                    Some(super_type) => self.builder.add_super(ty, super_type),
                    None => trace!(name = super_ref.inner(); "Dropping unresolved supertype"),
                }
            }
        }
    }

    fn build_nodes(&mut self, decls: &'a [NodeDecl<'src>], parent: Option<NodeId>) {
        for decl in decls {
            let kind = decl
                .kind
                .as_ref()
                .and_then(|kind| self.resolve_type(kind.inner()));
            let id = self.builder.add_node(
                *decl.name.inner(),
                kind,
                build_attributes(&decl.attributes),
                parent,
            );
            self.registry.insert(decl.id(), id);

            self.build_nodes(&decl.children, Some(id));
        }
    }

    fn build_nested_edges(
        &mut self,
        decls: &'a [NodeDecl<'src>],
        scope: &mut Vec<&'a NodeDecl<'src>>,
    ) {
        for decl in decls {
            scope.push(decl);
            let owner = self.registry.get(&decl.id()).copied();
            for edge in &decl.edges {
                self.build_edge(edge, owner, scope);
            }
            self.build_nested_edges(&decl.children, scope);
            scope.pop();
        }
    }

    fn build_edge(
        &mut self,
        edge: &EdgeDecl<'src>,
        owner: Option<NodeId>,
        scope: &[&'a NodeDecl<'src>],
    ) {
        let links = EdgeLinks {
            source: self.resolve_node(edge.source.inner(), scope),
            target: self.resolve_node(edge.target.inner(), scope),
            kind: edge
                .kind
                .as_ref()
                .and_then(|kind| self.resolve_type(kind.inner())),
        };
        trace!(
            source = edge.source.inner().as_str(),
            target = edge.target.inner().as_str(),
            links:?;
            "Built edge",
        );

        self.builder.add_edge(
            owner,
            links,
            edge.source.inner().as_str(),
            edge.target.inner().as_str(),
        );
    }

    fn resolve_type(&self, name: &str) -> Option<TypeId> {
        self.linker
            .resolve_type(name)
            .and_then(|index| self.types.get(index).copied())
    }

    fn resolve_node(&self, reference: &str, scope: &[&'a NodeDecl<'src>]) -> Option<NodeId> {
        self.linker
            .resolve_node(reference, scope)
            .and_then(|decl| self.registry.get(&decl.id()).copied())
    }
}
