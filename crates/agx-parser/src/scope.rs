//! Qualified-name scope resolution for edge endpoints.
//!
//! An endpoint reference such as `Risk` or `Parent.Child1` is resolved
//! against the nodes visible from the block it is written in. Resolution
//! happens in two steps:
//!
//! 1. [`ScopeResolver::candidates`] builds a prefix-filtered
//!    [`CandidateSet`] whose insertion order is its precedence order.
//! 2. [`ScopeResolver::resolve`] picks the candidate whose key equals the
//!    reference exactly.
//!
//! Candidates are collected nearest scope first. The descendants of the
//! block the reference is written in are keyed by their path relative to
//! that block. Each outer enclosing node, and then the document root, adds
//! its descendants' dotted paths, so `Parent.Child1` and ancestor-relative
//! paths resolve from anywhere inside `Parent`. Finally every node in the
//! document is offered under its bare name, in document order. A key that
//! is already present is never replaced, so a locally nested `Child1` wins
//! over an unrelated top-level `Child1`.

use indexmap::IndexMap;
use log::trace;

use crate::parser_types::NodeDecl;

/// How a candidate entered the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// A descendant of an enclosing scope, keyed by its relative path.
    Scoped,
    /// Any node in the document, keyed by its bare name.
    Global,
}

/// Receives resolution events from the scope resolver.
///
/// Every method has an empty default, so an observer only implements what
/// it needs.
pub trait ScopeObserver {
    /// A scope is about to be searched. `scope` is `None` for the document
    /// root.
    fn scope_searched(&self, _reference: &str, _scope: Option<&str>) {}

    /// A candidate was added under `key`.
    fn candidate_added(&self, _reference: &str, _key: &str, _source: CandidateSource) {}

    /// Final selection for `reference` finished.
    fn reference_resolved(&self, _reference: &str, _resolved: bool) {}
}

/// Observer that forwards every event to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ScopeObserver for LogObserver {
    fn scope_searched(&self, reference: &str, scope: Option<&str>) {
        let scope = scope.unwrap_or("<document>");
        trace!(reference, scope; "Searching scope");
    }

    fn candidate_added(&self, reference: &str, key: &str, source: CandidateSource) {
        trace!(reference, key, source:?; "Added candidate");
    }

    fn reference_resolved(&self, reference: &str, resolved: bool) {
        trace!(reference, resolved; "Resolved reference");
    }
}

/// Prefix-filtered candidates for one reference, in precedence order.
#[derive(Debug, Default)]
pub(crate) struct CandidateSet<'a, 'src> {
    entries: IndexMap<String, &'a NodeDecl<'src>>,
}

impl<'a, 'src> CandidateSet<'a, 'src> {
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the candidate registered under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&'a NodeDecl<'src>> {
        self.entries.get(key).copied()
    }

    /// Iterate the keys in precedence order.
    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Insert `node` under `key` unless the key is taken. Returns whether it
    /// was inserted.
    fn offer(&mut self, key: &str, node: &'a NodeDecl<'src>) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), node);
        true
    }
}

/// Resolves endpoint references over a parsed node tree.
pub(crate) struct ScopeResolver<'a, 'src> {
    roots: &'a [NodeDecl<'src>],
    all: Vec<&'a NodeDecl<'src>>,
    observer: &'a dyn ScopeObserver,
}

impl<'a, 'src> ScopeResolver<'a, 'src> {
    /// Create a resolver over the top-level nodes of a document.
    pub fn new(roots: &'a [NodeDecl<'src>], observer: &'a dyn ScopeObserver) -> Self {
        let mut all = Vec::new();
        flatten(roots, &mut all);
        Self {
            roots,
            all,
            observer,
        }
    }

    /// Build the candidate set for `reference` written inside `scope`.
    ///
    /// `scope` lists the enclosing nodes from outermost to innermost; it is
    /// empty for references written at the top level. An empty reference
    /// matches every node.
    pub fn candidates(
        &self,
        reference: &str,
        scope: &[&'a NodeDecl<'src>],
    ) -> CandidateSet<'a, 'src> {
        let mut set = CandidateSet::default();

        // The block the reference is written in contributes every relative
        // path. Outer scopes only contribute dotted paths, so bare names fall
        // through to the document-order global step.
        match scope.split_last() {
            Some((innermost, outer)) => {
                self.observer
                    .scope_searched(reference, Some(innermost.name.inner()));
                self.collect_scoped(&innermost.children, "", reference, false, &mut set);

                for enclosing in outer.iter().rev() {
                    self.observer
                        .scope_searched(reference, Some(enclosing.name.inner()));
                    self.collect_scoped(&enclosing.children, "", reference, true, &mut set);
                }

                self.observer.scope_searched(reference, None);
                self.collect_scoped(self.roots, "", reference, true, &mut set);
            }
            None => {
                self.observer.scope_searched(reference, None);
                self.collect_scoped(self.roots, "", reference, false, &mut set);
            }
        }

        for node in &self.all {
            let name = *node.name.inner();
            if name.starts_with(reference) && set.offer(name, node) {
                self.observer
                    .candidate_added(reference, name, CandidateSource::Global);
            }
        }

        set
    }

    /// Resolve `reference` written inside `scope` to a single declaration.
    ///
    /// Returns `None` for an empty reference or when no candidate key equals
    /// the reference.
    pub fn resolve(
        &self,
        reference: &str,
        scope: &[&'a NodeDecl<'src>],
    ) -> Option<&'a NodeDecl<'src>> {
        let resolved = if reference.is_empty() {
            None
        } else {
            self.candidates(reference, scope).get(reference)
        };
        self.observer
            .reference_resolved(reference, resolved.is_some());
        resolved
    }

    fn collect_scoped(
        &self,
        nodes: &'a [NodeDecl<'src>],
        prefix: &str,
        reference: &str,
        dotted_only: bool,
        set: &mut CandidateSet<'a, 'src>,
    ) {
        for node in nodes {
            let name = *node.name.inner();
            let path = if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{prefix}.{name}")
            };

            let matches = path.starts_with(reference);
            // Descendant paths extend this one, so they can only match when
            // one of the two is a prefix of the other.
            let may_descend = matches || reference.starts_with(path.as_str());

            let eligible = !dotted_only || !prefix.is_empty();
            if matches && eligible && set.offer(&path, node) {
                self.observer
                    .candidate_added(reference, &path, CandidateSource::Scoped);
            }
            if may_descend {
                self.collect_scoped(&node.children, &path, reference, dotted_only, set);
            }
        }
    }
}

fn flatten<'a, 'src>(nodes: &'a [NodeDecl<'src>], out: &mut Vec<&'a NodeDecl<'src>>) {
    for node in nodes {
        out.push(node);
        flatten(&node.children, out);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{lexer::tokenize, parser::build_document, parser_types::Document};

    #[derive(Default)]
    struct RecordingObserver {
        added: RefCell<Vec<(String, CandidateSource)>>,
        resolved: RefCell<Vec<(String, bool)>>,
    }

    impl ScopeObserver for RecordingObserver {
        fn candidate_added(&self, _reference: &str, key: &str, source: CandidateSource) {
            self.added.borrow_mut().push((key.to_string(), source));
        }

        fn reference_resolved(&self, reference: &str, resolved: bool) {
            self.resolved
                .borrow_mut()
                .push((reference.to_string(), resolved));
        }
    }

    fn document(source: &str) -> Document<'_> {
        let tokens = Box::leak(tokenize(source).unwrap().into_boxed_slice());
        build_document(tokens).unwrap()
    }

    const NESTED: &str = "
        Parent {
            Child1 { Grandchild; }
            Child2;
        }
        Child1;
        Other;
    ";

    #[test]
    fn test_scoped_candidates_precede_global_ones() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);
        let parent = &doc.nodes[0];

        let set = resolver.candidates("", &[parent]);
        let keys: Vec<&str> = set.keys().collect();

        assert_eq!(
            keys,
            vec![
                // Relative to Parent
                "Child1",
                "Child1.Grandchild",
                "Child2",
                // Dotted paths relative to the document root
                "Parent.Child1",
                "Parent.Child1.Grandchild",
                "Parent.Child2",
                // Bare names not already present, in document order
                "Parent",
                "Grandchild",
                "Other",
            ]
        );
    }

    #[test]
    fn test_nested_name_wins_over_top_level_name() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);
        let parent = &doc.nodes[0];
        let nested_child1 = &parent.children[0];
        let top_child1 = &doc.nodes[1];

        let local = resolver.resolve("Child1", &[parent]).unwrap();
        assert_eq!(local.id(), nested_child1.id());

        let qualified = resolver.resolve("Parent.Child1", &[parent]).unwrap();
        assert_eq!(qualified.id(), nested_child1.id());

        let from_root = resolver.resolve("Child1", &[]).unwrap();
        assert_eq!(from_root.id(), top_child1.id());
    }

    #[test]
    fn test_outer_bare_name_follows_document_order() {
        let doc = document("Y { B; } X { A; A -> B; } B;");
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);
        let x = &doc.nodes[1];
        let nested_b = &doc.nodes[0].children[0];

        let set = resolver.candidates("B", &[x]);
        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["B"]);

        let found = resolver.resolve("B", &[x]).unwrap();
        assert_eq!(found.id(), nested_b.id());

        // At the top level the root block is the enclosing scope.
        let top = resolver.resolve("B", &[]).unwrap();
        assert_eq!(top.id(), doc.nodes[2].id());
    }

    #[test]
    fn test_outer_scopes_only_add_dotted_paths() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);
        let parent = &doc.nodes[0];
        let child1 = &parent.children[0];

        // Inside Child1, a bare `Child2` is not keyed by the Parent walk but
        // still reaches the nested node through document order.
        let found = resolver.resolve("Child2", &[parent, child1]).unwrap();
        assert_eq!(found.id(), parent.children[1].id());

        let set = resolver.candidates("Child1", &[parent, child1]);
        let keys: Vec<&str> = set.keys().collect();
        assert_eq!(keys, vec!["Child1.Grandchild", "Child1"]);
        assert_eq!(set.get("Child1").unwrap().id(), child1.id());
    }

    #[test]
    fn test_prefix_filter() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);

        let set = resolver.candidates("Parent.C", &[]);
        let keys: Vec<&str> = set.keys().collect();

        assert_eq!(
            keys,
            vec!["Parent.Child1", "Parent.Child1.Grandchild", "Parent.Child2"]
        );
    }

    #[test]
    fn test_bare_name_of_deep_node_resolves_globally() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);

        let found = resolver.resolve("Grandchild", &[]).unwrap();
        assert_eq!(*found.name.inner(), "Grandchild");
    }

    #[test]
    fn test_relative_path_from_ancestor_scope() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);
        let parent = &doc.nodes[0];
        let child2 = &parent.children[1];

        // Written inside Child2, `Child1.Grandchild` is relative to Parent.
        let found = resolver
            .resolve("Child1.Grandchild", &[parent, child2])
            .unwrap();
        assert_eq!(found.id(), parent.children[0].children[0].id());
    }

    #[test]
    fn test_duplicate_siblings_first_wins() {
        let doc = document("A; A; B;");
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);

        let found = resolver.resolve("A", &[]).unwrap();
        assert_eq!(found.id(), doc.nodes[0].id());
        assert_eq!(resolver.candidates("A", &[]).len(), 1);
    }

    #[test]
    fn test_empty_reference_builds_full_set_but_never_resolves() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);

        assert!(!resolver.candidates("", &[]).is_empty());
        assert!(resolver.resolve("", &[]).is_none());
    }

    #[test]
    fn test_unknown_reference() {
        let doc = document(NESTED);
        let resolver = ScopeResolver::new(&doc.nodes, &LogObserver);

        assert!(resolver.candidates("Nope", &[]).is_empty());
        assert!(resolver.resolve("Nope", &[]).is_none());
        assert!(resolver.resolve("Parent.Nope", &[]).is_none());
    }

    #[test]
    fn test_observer_receives_events() {
        let doc = document(NESTED);
        let observer = RecordingObserver::default();
        let resolver = ScopeResolver::new(&doc.nodes, &observer);

        resolver.resolve("Other", &[]);
        resolver.resolve("Missing", &[]);

        assert_eq!(
            observer.added.borrow().as_slice(),
            &[("Other".to_string(), CandidateSource::Scoped)]
        );
        assert_eq!(
            observer.resolved.borrow().as_slice(),
            &[("Other".to_string(), true), ("Missing".to_string(), false)]
        );
    }
}
