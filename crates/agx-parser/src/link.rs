//! Reference linking over the raw declaration tree.
//!
//! Type references resolve by exact name against the document's type
//! declarations. Node references go through the [`ScopeResolver`].

use std::collections::{HashMap, hash_map::Entry};

use crate::{
    parser_types::{Document, NodeDecl},
    scope::{ScopeObserver, ScopeResolver},
};

pub(crate) struct Linker<'a, 'src> {
    types: HashMap<&'src str, usize>,
    nodes: ScopeResolver<'a, 'src>,
}

impl<'a, 'src> Linker<'a, 'src> {
    pub fn new(document: &'a Document<'src>, observer: &'a dyn ScopeObserver) -> Self {
        let mut types = HashMap::with_capacity(document.types.len());
        for (index, decl) in document.types.iter().enumerate() {
            // First declaration wins
            if let Entry::Vacant(entry) = types.entry(*decl.name.inner()) {
                entry.insert(index);
            }
        }

        Self {
            types,
            nodes: ScopeResolver::new(&document.nodes, observer),
        }
    }

    /// Resolve a type name to the index of its declaration in
    /// [`Document::types`].
    pub fn resolve_type(&self, name: &str) -> Option<usize> {
        self.types.get(name).copied()
    }

    /// Resolve a node reference written inside `scope`.
    ///
    /// `scope` lists the enclosing node declarations, outermost first.
    pub fn resolve_node(
        &self,
        reference: &str,
        scope: &[&'a NodeDecl<'src>],
    ) -> Option<&'a NodeDecl<'src>> {
        self.nodes.resolve(reference, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::build_document, scope::LogObserver};

    fn document(source: &str) -> Document<'_> {
        let tokens = Box::leak(tokenize(source).unwrap().into_boxed_slice());
        build_document(tokens).unwrap()
    }

    #[test]
    fn test_resolve_type_first_declaration_wins() {
        let doc = document("type A; type B; type A { Color = red; }");
        let linker = Linker::new(&doc, &LogObserver);

        assert_eq!(linker.resolve_type("A"), Some(0));
        assert_eq!(linker.resolve_type("B"), Some(1));
        assert_eq!(linker.resolve_type("C"), None);
    }

    #[test]
    fn test_resolve_node_in_scope() {
        let doc = document("X { A; B; A -> B; } A;");
        let linker = Linker::new(&doc, &LogObserver);
        let x = &doc.nodes[0];

        let inner = linker.resolve_node("A", &[x]).unwrap();
        assert_eq!(inner.id(), x.children[0].id());

        let outer = linker.resolve_node("A", &[]).unwrap();
        assert_eq!(outer.id(), doc.nodes[1].id());

        assert!(linker.resolve_node("X.C", &[x]).is_none());
    }
}
