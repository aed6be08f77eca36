use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token types for the AGX language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Type,

    // Literals, kept as raw source text
    StringLiteral(&'src str),
    NumberLiteral(&'src str),
    Identifier(&'src str),

    // Operators
    Arrow_, // ->
    Equals, // =
    Colon,  // :
    Dot,    // .

    // Punctuation
    LeftBrace,  // {
    RightBrace, // }
    Semicolon,  // ;
    Comma,      // ,

    // Comments
    LineComment(&'src str),  // // comment
    BlockComment(&'src str), // /* comment */

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Returns `true` for tokens the parser skips between meaningful tokens.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_) | Token::BlockComment(_)
        )
    }
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Type => write!(f, "type"),

            Token::StringLiteral(s) => write!(f, "{s}"),
            Token::NumberLiteral(n) => write!(f, "{n}"),
            Token::Identifier(name) => write!(f, "{name}"),

            Token::Arrow_ => write!(f, "->"),
            Token::Equals => write!(f, "="),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),

            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),

            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::BlockComment(comment) => write!(f, "/*{comment}*/"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
