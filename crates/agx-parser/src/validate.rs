//! Semantic checks over the raw declaration tree.
//!
//! Runs after parsing and before elaboration. Errors abort graph production;
//! warnings are logged at `warn` level and never abort.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ValidationError},
    link::Linker,
    parser_types::{Document, EdgeDecl, NodeDecl, TypeDecl},
    span::Spanned,
};

/// Validate `document`, returning the warnings it produced.
pub(crate) fn validate_document<'a, 'src>(
    document: &'a Document<'src>,
    linker: &Linker<'a, 'src>,
    source: &str,
) -> Result<Vec<Diagnostic>, ValidationError> {
    debug!(
        types = document.types.len(),
        nodes = document.nodes.len(),
        edges = document.edges.len();
        "Validating document",
    );

    let mut validator = Validator {
        linker,
        collector: DiagnosticCollector::new(),
    };
    validator.visit_document(document);

    match validator.collector.into_result() {
        Ok(warnings) => {
            for warning in &warnings {
                warn!(message = warning.message(); "Validation warning");
            }
            Ok(warnings)
        }
        Err(diagnostics) => Err(ValidationError::new(diagnostics, source)),
    }
}

/// Read-only traversal over the raw declaration tree.
///
/// Default implementations walk the whole tree, so implementors override
/// only the methods they care about. Node and edge visits carry the chain of
/// enclosing node declarations, outermost first.
pub(crate) trait Visitor<'a, 'src: 'a> {
    fn visit_document(&mut self, document: &'a Document<'src>) {
        for ty in &document.types {
            self.visit_type_decl(ty);
        }

        self.visit_siblings(&document.nodes);
        let mut scope = Vec::new();
        for node in &document.nodes {
            self.visit_node(node, &mut scope);
        }

        for edge in &document.edges {
            self.visit_edge(edge, &[]);
        }
    }

    fn visit_type_decl(&mut self, ty: &'a TypeDecl<'src>) {
        self.visit_type_name(&ty.name);
        for super_type in &ty.supers {
            self.visit_type_reference(super_type);
        }
    }

    fn visit_type_name(&mut self, _name: &'a Spanned<&'src str>) {}

    fn visit_type_reference(&mut self, _name: &'a Spanned<&'src str>) {}

    /// Visit one list of sibling nodes, before any of them is visited.
    fn visit_siblings(&mut self, _nodes: &'a [NodeDecl<'src>]) {}

    fn visit_node(&mut self, node: &'a NodeDecl<'src>, scope: &mut Vec<&'a NodeDecl<'src>>) {
        if let Some(kind) = &node.kind {
            self.visit_type_reference(kind);
        }

        self.visit_siblings(&node.children);

        scope.push(node);
        for edge in &node.edges {
            self.visit_edge(edge, scope);
        }
        for child in &node.children {
            self.visit_node(child, scope);
        }
        scope.pop();
    }

    fn visit_edge(&mut self, edge: &'a EdgeDecl<'src>, scope: &[&'a NodeDecl<'src>]) {
        self.visit_node_reference(&edge.source, edge, scope);
        self.visit_node_reference(&edge.target, edge, scope);
        if let Some(kind) = &edge.kind {
            self.visit_type_reference(kind);
        }
    }

    /// Visit one endpoint of `edge`.
    fn visit_node_reference(
        &mut self,
        _reference: &'a Spanned<String>,
        _edge: &'a EdgeDecl<'src>,
        _scope: &[&'a NodeDecl<'src>],
    ) {
    }
}

struct Validator<'l, 'a, 'src> {
    linker: &'l Linker<'a, 'src>,
    collector: DiagnosticCollector,
}

impl<'a, 'src: 'a> Visitor<'a, 'src> for Validator<'_, 'a, 'src> {
    /// Type names must start with a capital letter.
    fn visit_type_name(&mut self, name: &'a Spanned<&'src str>) {
        let capitalized = name
            .inner()
            .chars()
            .next()
            .is_some_and(|first| first.to_uppercase().eq([first]));
        if !capitalized {
            self.collector.emit(
                Diagnostic::error("Type name should start with a capital.")
                    .with_code(ErrorCode::E200)
                    .with_label(name.span(), "type name")
                    .with_help(format!("rename it to `{}`", capitalize(name.inner()))),
            );
        }
    }

    fn visit_type_reference(&mut self, name: &'a Spanned<&'src str>) {
        if self.linker.resolve_type(name.inner()).is_none() {
            self.collector.emit(
                Diagnostic::error(format!(
                    "Could not resolve reference to type `{}`.",
                    name.inner()
                ))
                .with_code(ErrorCode::E201)
                .with_label(name.span(), "unknown type"),
            );
        }
    }

    /// Sibling nodes should have distinct names; only the first one is
    /// reachable by name.
    fn visit_siblings(&mut self, nodes: &'a [NodeDecl<'src>]) {
        let mut seen: HashMap<&str, &NodeDecl<'src>> = HashMap::new();
        for node in nodes {
            let name = *node.name.inner();
            if let Some(first) = seen.get(name) {
                self.collector.emit(
                    Diagnostic::warning(format!("Duplicate node name `{name}`."))
                        .with_code(ErrorCode::E203)
                        .with_label(node.name.span(), "duplicate declared here")
                        .with_secondary_label(first.name.span(), "first declared here")
                        .with_help("references resolve to the first declaration"),
                );
            } else {
                seen.insert(name, node);
            }
        }
    }

    fn visit_node_reference(
        &mut self,
        reference: &'a Spanned<String>,
        edge: &'a EdgeDecl<'src>,
        scope: &[&'a NodeDecl<'src>],
    ) {
        if self.linker.resolve_node(reference.inner(), scope).is_none() {
            self.collector.emit(
                Diagnostic::error(format!(
                    "Could not resolve reference to node `{}`.",
                    reference.inner()
                ))
                .with_code(ErrorCode::E202)
                .with_label(reference.span(), "unknown node")
                .with_secondary_label(edge.span, "in this edge"),
            );
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::build_document, scope::LogObserver, span::Span};

    fn validate(source: &str) -> Result<Vec<Diagnostic>, ValidationError> {
        let tokens = tokenize(source).unwrap();
        let doc = build_document(&tokens).unwrap();
        let linker = Linker::new(&doc, &LogObserver);
        validate_document(&doc, &linker, source)
    }

    fn codes(err: &ValidationError) -> Vec<Option<ErrorCode>> {
        err.diagnostics().iter().map(Diagnostic::code).collect()
    }

    #[test]
    fn test_valid_document() {
        let warnings = validate(
            "type Person; Person Alice; Person Bob; Alice -> Bob; \
             X { A; B { C; } A -> B.C; }",
        )
        .unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_lowercase_type_name() {
        let err = validate("type Person;\ntype system;").unwrap_err();

        assert_eq!(codes(&err), vec![Some(ErrorCode::E200)]);
        let issue = &err.issues()[0];
        assert_eq!(issue.message, "Type name should start with a capital.");
        assert_eq!((issue.line, issue.column), (2, 6));
        assert_eq!(err.diagnostics()[0].help(), Some("rename it to `System`"));
    }

    #[test]
    fn test_underscore_type_name_passes_capital_check() {
        assert!(validate("type _Internal;").is_ok());
    }

    #[test]
    fn test_unresolved_type_references() {
        let err = validate("type A : Missing; Ghost N; N -> N : Nope;").unwrap_err();

        assert_eq!(
            codes(&err),
            vec![
                Some(ErrorCode::E201),
                Some(ErrorCode::E201),
                Some(ErrorCode::E201),
            ]
        );
    }

    #[test]
    fn test_unresolved_node_references() {
        let err = validate("A; A -> B;\nX { Y; Y -> A.Z; }").unwrap_err();

        assert_eq!(
            codes(&err),
            vec![Some(ErrorCode::E202), Some(ErrorCode::E202)]
        );
        // Nested edges are visited with the node tree, before root edges.
        assert_eq!(err.issues()[0].line, 2);
        assert_eq!(err.issues()[1].column, 9);

        let labels = err.diagnostics()[1].labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].span(), Span::new(3..10));
    }

    #[test]
    fn test_duplicate_siblings_warn() {
        let warnings = validate("A; A; P { C; C; }").unwrap();

        assert_eq!(warnings.len(), 2);
        assert!(
            warnings
                .iter()
                .all(|w| w.code() == Some(ErrorCode::E203) && !w.severity().is_error())
        );
    }

    #[test]
    fn test_same_name_in_different_scopes_is_not_duplicate() {
        let warnings = validate("A; P { A; }").unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_default_visitor_walks_every_reference() {
        #[derive(Default)]
        struct ReferenceCounter {
            types: usize,
            nodes: Vec<String>,
        }

        impl<'a, 'src: 'a> Visitor<'a, 'src> for ReferenceCounter {
            fn visit_type_reference(&mut self, _name: &'a Spanned<&'src str>) {
                self.types += 1;
            }

            fn visit_node_reference(
                &mut self,
                reference: &'a Spanned<String>,
                _edge: &'a EdgeDecl<'src>,
                scope: &[&'a NodeDecl<'src>],
            ) {
                self.nodes.push(format!("{}@{}", reference.inner(), scope.len()));
            }
        }

        let source = "type A : B; A X { Y { C -> D : A; } } X -> Y;";
        let tokens = tokenize(source).unwrap();
        let doc = build_document(&tokens).unwrap();
        let mut counter = ReferenceCounter::default();
        counter.visit_document(&doc);

        // Supertype, node kind, edge kind
        assert_eq!(counter.types, 3);
        assert_eq!(counter.nodes, vec!["C@2", "D@2", "X@0", "Y@0"]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("system"), "System");
        assert_eq!(capitalize("ßig"), "SSig");
        assert_eq!(capitalize(""), "");
    }
}
