use crate::{
    parser::{
        ast::expr::Expr,
        error,
        fmt::{symbol_latex, Latex},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl std::fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A floating-point literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the floating-point literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl std::fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol / identifier literal. Symbols are used to represent variables and functions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Latex for LitSym {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match symbol_latex(&self.name) {
            Some(latex) => write!(f, "{}", latex),
            None if self.name.chars().count() > 1 => write!(f, "\\mathrm{{{}}}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A list literal, such as `[x, x^2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitList {
    /// The values in the list.
    pub values: Vec<Expr>,

    /// The region of the source code that this literal was parsed from, including the brackets.
    pub span: Range<usize>,
}

impl Parse for LitList {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.next_token()?;
        if open.kind != TokenKind::OpenSquare {
            return Err(Error::new(vec![open.span], error::UnexpectedToken {
                expected: &[TokenKind::OpenSquare],
                found: open.kind,
            }));
        }

        let mut values = Vec::new();
        loop {
            if let Some(close) = input.eat(TokenKind::CloseSquare) {
                return Ok(Self {
                    values,
                    span: open.span.start..close.span.end,
                });
            }
            if input.is_eof() {
                return Err(Error::new(vec![open.span], error::UnclosedBracket));
            }

            values.push(input.try_parse::<Expr>()?);

            if input.eat(TokenKind::Comma).is_none() && input.peek_kind(0) != Some(TokenKind::CloseSquare) {
                if input.is_eof() {
                    return Err(Error::new(vec![open.span], error::UnclosedBracket));
                }
                let found = input.peek_kind(0).unwrap_or(TokenKind::CloseSquare);
                return Err(input.error(error::UnexpectedToken {
                    expected: &[TokenKind::Comma, TokenKind::CloseSquare],
                    found,
                }));
            }
        }
    }
}

impl std::fmt::Display for LitList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            value.fmt(f)?;
        }
        write!(f, "]")
    }
}

impl Latex for LitList {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\left[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            value.fmt_latex(f)?;
        }
        write!(f, "\\right]")
    }
}

/// Represents a literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer literal.
    Integer(LitInt),

    /// A floating-point literal.
    Float(LitFloat),

    /// A symbol / identifier literal.
    Symbol(LitSym),

    /// A list literal.
    List(LitList),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
            Literal::List(list) => list.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_kind(0) == Some(TokenKind::OpenSquare) {
            return LitList::parse(input).map(Literal::List);
        }

        let token = input.next_token()?;
        match token.kind {
            TokenKind::Int => Ok(Literal::Integer(LitInt {
                value: token.lexeme.to_owned(),
                span: token.span,
            })),
            TokenKind::Float => Ok(Literal::Float(LitFloat {
                value: token.lexeme.to_owned(),
                span: token.span,
            })),
            TokenKind::Name => Ok(Literal::Symbol(LitSym {
                name: token.lexeme.to_owned(),
                span: token.span,
            })),
            found => Err(Error::new(vec![token.span], error::UnexpectedToken {
                expected: &[TokenKind::Int, TokenKind::Float, TokenKind::Name, TokenKind::OpenSquare],
                found,
            })),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
            Literal::List(list) => list.fmt(f),
        }
    }
}

impl Latex for Literal {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => write!(f, "{}", int.value),
            Literal::Float(float) => match float.value.split_once(['e', 'E']) {
                Some((mantissa, exponent)) => {
                    write!(f, "{} \\cdot 10^{{{}}}", mantissa, exponent.trim_start_matches('+'))
                },
                None => write!(f, "{}", float.value),
            },
            Literal::Symbol(sym) => sym.fmt_latex(f),
            Literal::List(list) => list.fmt_latex(f),
        }
    }
}
