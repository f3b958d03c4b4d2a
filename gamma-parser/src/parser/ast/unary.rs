use crate::parser::{
    ast::{binary::Binary, expr::{Expr, Primary}},
    fmt::Latex,
    token::op::{UnaryOp, UnaryOpKind},
    Associativity,
    Parser,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returns true if the current token is a unary operator of the given associativity.
fn at_unary_op(input: &Parser, associativity: Associativity) -> bool {
    input
        .peek_kind(0)
        .and_then(UnaryOpKind::from_token)
        .map_or(false, |kind| kind.associativity() == associativity)
}

/// A unary expression, such as `2!`. Unary expressions can include nested expressions.
///
/// Unary expressions do not directly implement [`Parse`]. Instead, [`Unary::parse_or_lower`]
/// parses a unary expression or the operand it would apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression (left or right, depending on the associativity).
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parse a unary expression with right-associativity, such as `-x`.
    ///
    /// The operand extends over any binary operators that bind tighter than the unary operator,
    /// so `-x^2` is `-(x^2)`.
    pub fn parse_right(input: &mut Parser) -> Result<Self, Error> {
        let op = input.try_parse::<UnaryOp>()?;
        let start_span = op.span.start;
        let operand = input.nested(|input| {
            let lhs = Unary::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, op.precedence())
        })?;
        let end_span = operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span: start_span..end_span,
        })
    }

    /// Parse a unary expression with left-associativity, such as `3!`, or just the operand if
    /// there is no operator after it.
    pub fn parse_left_or_operand(input: &mut Parser) -> Result<Expr, Error> {
        let mut result: Expr = input.try_parse::<Primary>()?.into();
        let start_span = result.span().start;

        while at_unary_op(input, Associativity::Left) {
            let op = input.try_parse::<UnaryOp>()?;
            let end_span = op.span.end;
            result = Expr::Unary(Self {
                operand: Box::new(result),
                op,
                span: start_span..end_span,
            });
        }

        Ok(result)
    }

    /// Parses a unary expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if at_unary_op(input, Associativity::Right) {
            Self::parse_right(input).map(Expr::Unary)
        } else {
            Self::parse_left_or_operand(input)
        }
    }
}

impl std::fmt::Display for Unary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.op.associativity() {
            Associativity::Left => {
                self.operand.fmt(f)?;
                self.op.fmt(f)
            },
            Associativity::Right => {
                self.op.fmt(f)?;
                self.operand.fmt(f)
            },
        }
    }
}

impl Latex for Unary {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.associativity() {
            Associativity::Left => {
                self.operand.fmt_latex(f)?;
                self.op.fmt_latex(f)
            },
            Associativity::Right => {
                self.op.fmt_latex(f)?;
                self.operand.fmt_latex(f)
            },
        }
    }
}
