//! The kinds of errors that can occur while parsing.

use ariadne::Fmt;
use gamma_attrs::ErrorKind;
use gamma_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A character that has no meaning in a mathematical expression was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid character `{}`", character),
    labels = ["this character is not allowed here"],
)]
pub struct InvalidCharacter {
    /// The offending character.
    pub character: String,
}

/// A parenthesis was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// The input nests more deeply than the parser allows.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is nested too deeply",
    labels = ["the nesting limit is exceeded here"],
    help = format!("expressions may nest at most {} levels deep", limit),
)]
pub struct NestingTooDeep {
    /// The deepest nesting allowed.
    pub limit: usize,
}

/// A square bracket was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed bracket",
    labels = ["this bracket is not closed"],
    help = "add a closing bracket `]` somewhere after this",
)]
pub struct UnclosedBracket;

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// A positional argument was given after a keyword argument.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "positional argument follows keyword argument",
    labels = ["this argument has no name", "but this earlier argument does"],
    help = format!("move the positional arguments before {}", "name=value".fg(EXPR)),
)]
pub struct PositionalAfterKeyword;

/// The same keyword argument was given twice.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("keyword argument `{}` repeated", name),
    labels = ["this argument", "repeats this one"],
)]
pub struct DuplicateKeyword {
    /// The repeated keyword.
    pub name: String,
}
