use logos::Logos;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    #[regex(r"[\n\r]+")]
    NewLine,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("**")]
    Pow,

    #[token("^")]
    Caret,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("%")]
    Mod,

    #[token("!")]
    Factorial,

    #[token("==")]
    Eq,

    #[token("=")]
    Assign,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+")]
    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)[eE][+-]?[0-9]+")]
    Float,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::NewLine)
    }

    /// Returns true if the token is a numeric literal.
    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    ///
    /// Tokens inserted by a transform have an empty span located where they were inserted.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The lexeme of the token. This is usually the slice of the source that was tokenized, but
    /// transforms can replace it (for example, a synonym replaced with its canonical name).
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Returns true if the token was inserted by a transform rather than read from the source.
    pub fn is_synthetic(&self) -> bool {
        self.span.is_empty()
    }
}
