//! Raw declaration tree produced by the parser.
//!
//! Nothing here is resolved: type and node references are kept as the text
//! that was written, and attribute values as raw literal text.

use crate::span::{Span, Spanned};

/// Identity of a raw node declaration: the byte offset of its name token.
///
/// Two declarations can share a name but never a name token, so the offset
/// is unique per declaration within one source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

/// A parsed document: top-level declarations grouped by kind, each group in
/// declaration order.
#[derive(Debug, Default)]
pub struct Document<'src> {
    pub types: Vec<TypeDecl<'src>>,
    pub nodes: Vec<NodeDecl<'src>>,
    pub edges: Vec<EdgeDecl<'src>>,
    pub attributes: Vec<AttributeDecl<'src>>,
}

/// `type Name : Super1, Super2 { attributes }`
#[derive(Debug)]
pub struct TypeDecl<'src> {
    pub name: Spanned<&'src str>,
    pub supers: Vec<Spanned<&'src str>>,
    pub attributes: Vec<AttributeDecl<'src>>,
}

/// `Kind Name { attributes, nodes, edges }` or `Name;`
#[derive(Debug)]
pub struct NodeDecl<'src> {
    pub kind: Option<Spanned<&'src str>>,
    pub name: Spanned<&'src str>,
    pub children: Vec<NodeDecl<'src>>,
    pub edges: Vec<EdgeDecl<'src>>,
    pub attributes: Vec<AttributeDecl<'src>>,
}

impl NodeDecl<'_> {
    /// Get the identity of this declaration.
    pub fn id(&self) -> DeclId {
        DeclId(self.name.span().start())
    }
}

/// `source -> target : Kind;`
///
/// Endpoint references are dotted paths such as `Parent.Child`, joined
/// without whitespace.
#[derive(Debug)]
pub struct EdgeDecl<'src> {
    pub source: Spanned<String>,
    pub target: Spanned<String>,
    pub kind: Option<Spanned<&'src str>>,
    pub span: Span,
}

/// `Name = value;` with the value's raw literal text.
#[derive(Debug)]
pub struct AttributeDecl<'src> {
    pub name: Spanned<&'src str>,
    pub value: Spanned<&'src str>,
}
