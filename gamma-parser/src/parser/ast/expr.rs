use crate::{
    parser::{
        ast::{binary::Binary, call::Call, literal::Literal, paren::Paren, unary::Unary},
        error,
        fmt::Latex,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of mathematical expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `diff(x^2, x)`.
    Call(Call),

    /// A unary operation, such as `-x` or `3!`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }

    /// Returns the call this expression is, looking through parentheses.
    pub fn as_call(&self) -> Option<&Call> {
        match self.innermost() {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.nested(|input| {
            let lhs = Unary::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, Precedence::Any)
        })
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

impl Latex for Expr {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt_latex(f),
            Expr::Paren(paren) => paren.fmt_latex(f),
            Expr::Call(call) => call.fmt_latex(f),
            Expr::Unary(unary) => unary.fmt_latex(f),
            Expr::Binary(binary) => binary.fmt_latex(f),
        }
    }
}

/// Represents a primary expression: an operand that binds tighter than any operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression.
    Paren(Paren),

    /// A function call.
    Call(Call),
}

impl Primary {
    /// Returns the span of the primary expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Primary::Literal(literal) => literal.span(),
            Primary::Paren(paren) => paren.span(),
            Primary::Call(call) => call.span(),
        }
    }
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let Some((kind, lexeme)) = input.current_token().map(|token| (token.kind, token.lexeme)) else {
            return Err(input.error(error::UnexpectedEof));
        };

        match kind {
            TokenKind::Name if input.peek_kind(1) == Some(TokenKind::OpenParen) => {
                Call::parse(input).map(Primary::Call)
            },
            TokenKind::Int | TokenKind::Float | TokenKind::Name | TokenKind::OpenSquare => {
                Literal::parse(input).map(Primary::Literal)
            },
            TokenKind::OpenParen => Paren::parse(input).map(Primary::Paren),
            TokenKind::CloseParen => Err(input.error(error::UnclosedParenthesis { opening: false })),
            TokenKind::Symbol => Err(input.error(error::InvalidCharacter {
                character: lexeme.to_string(),
            })),
            found => Err(input.error(error::UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Name,
                    TokenKind::OpenParen,
                    TokenKind::OpenSquare,
                    TokenKind::Sub,
                ],
                found,
            })),
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Expr::Literal(literal),
            Primary::Paren(paren) => Expr::Paren(paren),
            Primary::Call(call) => Expr::Call(call),
        }
    }
}
