//! Lexical analyzer for AGX source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! Literal tokens keep their raw source text (string literals include their
//! quotes) so that value coercion sees exactly what was written.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a single or double quoted string literal, returning its raw text.
///
/// Escapes (a backslash followed by any character other than a line break)
/// are kept verbatim. Literals may not span lines.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();
    let quote = peek(one_of(['"', '\''])).parse_next(input)?;

    let escape = preceded('\\', none_of(['\n', '\r'])).void();
    let plain = none_of([quote, '\\', '\n', '\r']).void();
    let content = repeat(0.., alt((escape, plain))).map(|()| ());

    (
        quote,
        cut_err(terminated(content, quote)).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("close the string on the same line"),
            start: start_pos,
        }),
    )
        .take()
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse a number literal: `-`? digits (`.` digits)? exponent?
fn number_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
        // `12abc` is not a number followed by an identifier
        peek(not(one_of(is_identifier_char))),
    )
        .take()
        .map(Token::NumberLiteral)
        .parse_next(input)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse block comment delimited by '/*' and '*/'
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    preceded(
        "/*",
        cut_err(terminated(take_until(0.., "*/"), "*/")).context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "unterminated block comment",
            help: Some("add closing `*/`"),
            start: start_pos,
        }),
    )
    .map(Token::BlockComment)
    .parse_next(input)
}

/// Parse keywords with word boundary checking
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(literal("type"), peek(not(one_of(is_identifier_char))))
        .value(Token::Type)
        .parse_next(input)
}

/// Parse identifiers
fn identifier<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    // Start with letter or underscore, followed by alphanumeric or underscore
    take_while(1.., is_identifier_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse multi-character operators
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    literal("->").value(Token::Arrow_).parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '='.value(Token::Equals),
        ':'.value(Token::Colon),
        '.'.value(Token::Dot),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,        // Must come before block comment
        block_comment,       // Must come before single chars
        string_literal,      // Must come before any single char
        multi_char_operator, // Must come before number (`->` vs `-1`)
        number_literal,      // Must come before identifier
        keyword,             // Must come before identifier
        identifier,          // Must come before single chars
        single_char_token,   // Single character tokens
        newline,             // Must come before whitespace
        whitespace,          // General whitespace
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => {
                    self.tokens.push(token);
                }
                Err(e) => {
                    let error_pos = input.current_token_start();

                    let diagnostic = Self::convert_err_mode(e, error_pos);
                    self.diagnostics.emit(diagnostic);

                    // Skip one character and keep going
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no diagnostic context is
    /// found.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize source text, collecting every lexical error.
///
/// The lexer recovers from each error by skipping one character, so a
/// single call reports all problems in the input.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully parsed
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input);
    log::trace!(tokens = lexer.tokens.len(); "Tokenized input");
    lexer.finish()
}
