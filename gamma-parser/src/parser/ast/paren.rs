use crate::{
    parser::{ast::expr::Expr, error, fmt::Latex, Parse, Parser},
    tokenizer::TokenKind,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parenthesized expression. A [`Paren`] can only contain a single expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the innermost expression in the parenthesized expression.
    pub fn innermost(&self) -> &Expr {
        self.expr.innermost()
    }

    /// Returns the innermost expression in the parenthesized expression, consuming the [`Paren`].
    pub fn into_innermost(self) -> Expr {
        let mut inner = self.expr;
        while let Expr::Paren(paren) = *inner {
            inner = paren.expr;
        }
        *inner
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open_paren = input.next_token()?;
        if open_paren.kind != TokenKind::OpenParen {
            return Err(Error::new(vec![open_paren.span], error::UnexpectedToken {
                expected: &[TokenKind::OpenParen],
                found: open_paren.kind,
            }));
        }

        if let Some(close_paren) = input.eat(TokenKind::CloseParen) {
            return Err(Error::new(
                vec![open_paren.span.start..close_paren.span.end],
                error::EmptyParenthesis,
            ));
        }

        let expr = input.try_parse::<Expr>()?;
        let close_paren = input.eat(TokenKind::CloseParen).ok_or_else(|| {
            Error::new(vec![open_paren.span.clone()], error::UnclosedParenthesis { opening: true })
        })?;

        Ok(Self {
            expr: Box::new(expr),
            span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl std::fmt::Display for Paren {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(")?;
        self.expr.fmt(f)?;
        write!(f, ")")
    }
}

impl Latex for Paren {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\\left(")?;
        self.expr.fmt_latex(f)?;
        write!(f, "\\right)")
    }
}
