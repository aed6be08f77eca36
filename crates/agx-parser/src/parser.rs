//! Parser for AGX source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer) into
//! the raw declaration tree defined in [`parser_types`](super::parser_types).
//! The public entry point is [`build_document`].

use winnow::{
    Parser as _,
    combinator::{alt, eof, opt, preceded, repeat, separated},
    error::{AddContext, ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate start_offset as: `tokens.len() - start_offset_value`
    StartOffset(usize),
    /// Remaining token count at the start of the innermost failing statement
    StatementStart(usize),
}

type Input<'src> = AgxTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type AgxTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// One top-level statement, before grouping.
enum Statement<'src> {
    Type(types::TypeDecl<'src>),
    Node(types::NodeDecl<'src>),
    Edge(types::EdgeDecl<'src>),
    Attribute(types::AttributeDecl<'src>),
}

/// One member of a node block, before grouping.
enum BlockItem<'src> {
    Node(types::NodeDecl<'src>),
    Edge(types::EdgeDecl<'src>),
    Attribute(types::AttributeDecl<'src>),
}

/// Run `f`, turning any failure into a Cut error that remembers where the
/// committed construct started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(e)) | Err(ErrMode::Cut(e)) => {
            let checkpoint = input.checkpoint();
            Err(ErrMode::Cut(e.add_context(
                input,
                &checkpoint,
                Context::StartOffset(start_remaining),
            )))
        }
        Err(e) => Err(e),
    }
}

/// Run a statement parser, recording where the statement started if it
/// fails after committing.
fn statement_start<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Err(ErrMode::Cut(e)) => {
            let checkpoint = input.checkpoint();
            Err(ErrMode::Cut(e.add_context(
                input,
                &checkpoint,
                Context::StatementStart(start_remaining),
            )))
        }
        other => other,
    }
}

/// Parse whitespace and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse one punctuation token, skipping leading whitespace/comments
fn punctuation<'src>(
    input: &mut Input<'src>,
    expected: Token<'static>,
    label: &'static str,
) -> IResult<Span> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'_>| {
            (token.token == expected).then_some(token.span)
        }),
    )
    .context(Context::Label(label))
    .parse_next(input)
}

fn semicolon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::Semicolon, "semicolon")
}

fn left_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::LeftBrace, "`{`")
}

fn right_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::RightBrace, "`}`")
}

fn colon<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::Colon, "`:`")
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::Comma, "`,`")
}

fn equals<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::Equals, "`=`")
}

fn arrow<'src>(input: &mut Input<'src>) -> IResult<Span> {
    punctuation(input, Token::Arrow_, "`->`")
}

/// Parse an identifier, skipping leading whitespace/comments
fn identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'src>| match token.token {
            Token::Identifier(name) => Some(Spanned::new(name, token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse an identifier directly at the current position
fn adjacent_identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse a dotted reference: `Name` or `Parent.Child.Leaf`
///
/// Segments and dots must be adjacent.
fn qualified_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    let first = identifier.parse_next(input)?;
    let mut path = first.inner().to_string();
    let mut unified_span = first.span();

    loop {
        let checkpoint = input.checkpoint();
        let dot = any::<_, ErrMode<ContextError<Context>>>
            .verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Dot))
            .parse_next(input);

        match dot {
            Ok(_) => {
                let next = cut_err(input, adjacent_identifier)?;
                path.push('.');
                path.push_str(next.inner());
                unified_span = unified_span.union(next.span());
            }
            Err(_) => {
                input.reset(&checkpoint);
                break;
            }
        }
    }

    Ok(Spanned::new(path, unified_span))
}

/// Parse a raw attribute value: string, number, or identifier
fn attribute_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'src>| match token.token {
            Token::StringLiteral(raw) | Token::NumberLiteral(raw) | Token::Identifier(raw) => {
                Some(Spanned::new(raw, token.span))
            }
            _ => None,
        }),
    )
    .context(Context::Label("attribute value"))
    .parse_next(input)
}

/// Parse `Name = value;`
fn attribute<'src>(input: &mut Input<'src>) -> IResult<types::AttributeDecl<'src>> {
    let name = identifier.parse_next(input)?;
    equals.parse_next(input)?;

    cut_err(input, |input| {
        let value = attribute_value.parse_next(input)?;
        semicolon.parse_next(input)?;
        Ok(types::AttributeDecl { name, value })
    })
}

/// Parse `source -> target;` or `source -> target : Kind;`
fn edge<'src>(input: &mut Input<'src>) -> IResult<types::EdgeDecl<'src>> {
    let source = qualified_name.parse_next(input)?;
    arrow.parse_next(input)?;

    cut_err(input, |input| {
        let target = qualified_name.parse_next(input)?;
        let kind = opt(preceded(colon, identifier)).parse_next(input)?;
        let end = semicolon.parse_next(input)?;
        let span = source.span().union(end);
        Ok(types::EdgeDecl {
            source,
            target,
            kind,
            span,
        })
    })
}

/// Parse a single member of a node block
fn block_item<'src>(input: &mut Input<'src>) -> IResult<BlockItem<'src>> {
    statement_start(input, |input| {
        alt((
            attribute.map(BlockItem::Attribute),
            edge.map(BlockItem::Edge),
            node.map(BlockItem::Node),
        ))
        .parse_next(input)
    })
}

/// Parse the members of a node block up to and including `}`
fn block<'src>(input: &mut Input<'src>) -> IResult<Vec<BlockItem<'src>>> {
    left_brace.parse_next(input)?;

    cut_err(input, |input| {
        let items: Vec<BlockItem<'src>> = repeat(0.., block_item).parse_next(input)?;
        right_brace.parse_next(input)?;
        opt(semicolon).parse_next(input)?;
        Ok(items)
    })
}

/// Parse `Kind Name;`, `Name;`, or either followed by a block
fn node<'src>(input: &mut Input<'src>) -> IResult<types::NodeDecl<'src>> {
    let first = identifier.parse_next(input)?;
    let second = opt(identifier).parse_next(input)?;
    let (kind, name) = match second {
        Some(name) => (Some(first), name),
        None => (None, first),
    };

    cut_err(input, |input| {
        let body = alt((block, semicolon.map(|_| Vec::new()))).parse_next(input)?;

        let mut node = types::NodeDecl {
            kind,
            name,
            children: Vec::new(),
            edges: Vec::new(),
            attributes: Vec::new(),
        };
        for item in body {
            match item {
                BlockItem::Node(child) => node.children.push(child),
                BlockItem::Edge(edge) => node.edges.push(edge),
                BlockItem::Attribute(attr) => node.attributes.push(attr),
            }
        }
        Ok(node)
    })
}

/// Parse `type Name : Super1, Super2;` with an optional attribute block
fn type_decl<'src>(input: &mut Input<'src>) -> IResult<types::TypeDecl<'src>> {
    preceded(
        ws_comments0,
        any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Type)),
    )
    .context(Context::Label("type declaration"))
    .parse_next(input)?;

    cut_err(input, |input| {
        let name = identifier.parse_next(input)?;
        let supers: Vec<Spanned<&'src str>> =
            opt(preceded(colon, separated(1.., identifier, comma)))
                .parse_next(input)?
                .unwrap_or_default();

        let attributes = alt((
            |input: &mut Input<'src>| {
                left_brace.parse_next(input)?;
                let attributes: Vec<types::AttributeDecl<'src>> =
                    repeat(0.., attribute).parse_next(input)?;
                right_brace.parse_next(input)?;
                opt(semicolon).parse_next(input)?;
                Ok(attributes)
            },
            semicolon.map(|_| Vec::new()),
        ))
        .parse_next(input)?;

        Ok(types::TypeDecl {
            name,
            supers,
            attributes,
        })
    })
}

/// Parse a top-level statement
fn statement<'src>(input: &mut Input<'src>) -> IResult<Statement<'src>> {
    statement_start(input, |input| {
        alt((
            type_decl.map(Statement::Type),
            attribute.map(Statement::Attribute),
            edge.map(Statement::Edge),
            node.map(Statement::Node),
        ))
        .parse_next(input)
    })
}

/// Parse a whole document and group its statements
fn document<'src>(input: &mut Input<'src>) -> IResult<types::Document<'src>> {
    let statements: Vec<Statement<'src>> = repeat(0.., statement).parse_next(input)?;
    ws_comments0.parse_next(input)?;
    eof.context(Context::Label("declaration")).parse_next(input)?;

    let mut document = types::Document::default();
    for statement in statements {
        match statement {
            Statement::Type(ty) => document.types.push(ty),
            Statement::Node(node) => document.nodes.push(node),
            Statement::Edge(edge) => document.edges.push(edge),
            Statement::Attribute(attr) => document.attributes.push(attr),
        }
    }
    Ok(document)
}

/// Convert a winnow error to a diagnostic.
///
/// Extracts position information from error context (StartOffset) and
/// calculates the error span from the token array.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    // Prefer the innermost failing statement, then the innermost committed
    // construct.
    let start_remaining = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
            .context()
            .find_map(|ctx| match ctx {
                Context::StatementStart(n) => Some(*n),
                _ => None,
            })
            .or_else(|| {
                e.context().find_map(|ctx| match ctx {
                    Context::StartOffset(n) => Some(*n),
                    _ => None,
                })
            }),
        _ => None,
    };

    let end_offset = tokens.len() - current_remaining;
    let start_offset = start_remaining.map_or(end_offset, |r| tokens.len() - r);

    let meaningful_span = |range: std::ops::Range<usize>| -> Span {
        let slice = tokens.get(range).unwrap_or_default();
        let mut meaningful = slice.iter().filter(|t| !t.token.is_trivia());
        let first = meaningful.next().or(slice.first()).map(|t| t.span);
        let last = meaningful.next_back().map(|t| t.span).or(first);
        match (first, last) {
            (Some(first), Some(last)) => first.union(last),
            _ => Span::default(),
        }
    };

    match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            let contexts: Vec<String> = e
                .context()
                .filter_map(|ctx| match ctx {
                    Context::Label(label) => Some(format!("expected {label}")),
                    _ => None,
                })
                .collect();

            let message = if contexts.is_empty() {
                "unexpected token or end of input".to_string()
            } else {
                contexts.join(" → ")
            };

            // Cover the committed statement up to and including the
            // offending token, or the offending token alone.
            let error_span = if end_offset < tokens.len() {
                let offending = end_offset
                    + tokens[end_offset..]
                        .iter()
                        .position(|t| !t.token.is_trivia())
                        .unwrap_or(0);
                meaningful_span(start_offset.min(offending)..offending + 1)
            } else {
                meaningful_span(start_offset.min(end_offset)..tokens.len())
            };

            Diagnostic::error(format!("unexpected token: {message}"))
                .with_code(ErrorCode::E100)
                .with_label(error_span, "unexpected token")
                .with_help("check the statement syntax and its terminating `;`")
        }
        ErrMode::Incomplete(_) => {
            // Not expected: the input is never streamed.
            let error_span = meaningful_span(end_offset.min(tokens.len())..tokens.len());

            Diagnostic::error("incomplete input, more tokens expected")
                .with_code(ErrorCode::E101)
                .with_label(error_span, "incomplete")
                .with_help("ensure input is complete")
        }
    }
}

/// Build the raw declaration tree from tokens.
pub fn build_document<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<types::Document<'src>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match document.parse_next(&mut token_slice) {
        Ok(document) => Ok(document),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
