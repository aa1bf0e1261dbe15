use std::fmt;

use crate::span::Span;

/// Token types for the format group language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Literals
    StringLiteral(String), // "..."
    BigString(String),     // << ... >>
    Identifier(&'src str),

    // Punctuation
    Define,     // ::=
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,

    // Comments
    LineComment(&'src str),  // // comment
    BlockComment(&'src str), // /* comment */

    // Whitespace
    Whitespace,
    Newline,
}

impl Token<'_> {
    /// Whether the parser skips this token between meaningful ones.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_) | Token::BlockComment(_)
        )
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::StringLiteral(_) => write!(f, "string"),
            Token::BigString(_) => write!(f, "big string"),
            Token::Identifier(name) => write!(f, "`{name}`"),
            Token::Define => write!(f, "`::=`"),
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::Comma => write!(f, "`,`"),
            Token::LineComment(_) | Token::BlockComment(_) => write!(f, "comment"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
        }
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
