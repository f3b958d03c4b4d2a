use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    fmt::{fmt_pow, Latex},
    token::op::{BinOp, BinOpKind},
    Associativity,
    Parser,
    Precedence,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Returns the binary operator at the cursor, if there is one, without consuming it.
fn peek_bin_op(input: &Parser) -> Option<BinOp> {
    let token = input.current_token()?;
    BinOpKind::from_token(token.kind).map(|kind| BinOp {
        kind,
        implicit: token.is_synthetic(),
        span: token.span.clone(),
    })
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    ///
    /// If we are parsing the expression `1 + 2 * 3`, we will first parse the left-hand-side `1`,
    /// then the operator `+`, then the right-hand-side `2`. However, before we build the
    /// corresponding AST node, we should check if the operator after `2` has higher precedence
    /// than `+` (if it exists).
    ///
    /// If it does, we should parse the expression starting with `2` first, so that we get `2 * 3`
    /// as the right-hand-side to the `1 +` node. If it does not (such as in `3 * 2 + 1`), we
    /// build the AST node `3 * 2` first, and [`Self::parse_expr`] picks up the `+ 1` afterwards.
    fn complete_rhs(input: &mut Parser, lhs: Expr, op: BinOp, mut rhs: Expr) -> Result<Expr, Error> {
        let precedence = op.precedence();

        while let Some(next_op) = peek_bin_op(input) {
            if next_op.precedence() > precedence
                || (next_op.precedence() == precedence && next_op.associativity() == Associativity::Right)
            {
                rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
            } else {
                break;
            }
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }))
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator of at least the given precedence and a right-hand-side.
    ///
    /// Every operator in the chain adds a level to the tree, since `1 + 2 + 3` is
    /// `(1 + 2) + 3`.
    pub fn parse_expr(input: &mut Parser, lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        let depth = input.depth;
        let result = Self::parse_chain(input, lhs, precedence);
        input.depth = depth;
        result
    }

    fn parse_chain(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        while let Some(op) = peek_bin_op(input) {
            if op.precedence() < precedence {
                break;
            }

            input.descend()?;
            input.next_token()?;
            let rhs = Unary::parse_or_lower(input)?;
            lhs = Self::complete_rhs(input, lhs, op, rhs)?;
        }

        Ok(lhs)
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.lhs.fmt(f)?;
        self.op.fmt(f)?;
        self.rhs.fmt(f)
    }
}

impl Latex for Binary {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.kind {
            BinOpKind::Exp => fmt_pow(f, Some(&*self.lhs), Some(&*self.rhs)),
            BinOpKind::Div => {
                write!(f, "\\frac{{")?;
                self.lhs.innermost().fmt_latex(f)?;
                write!(f, "}}{{")?;
                self.rhs.innermost().fmt_latex(f)?;
                write!(f, "}}")
            },
            BinOpKind::Mul if self.op.implicit && is_numeric(&self.rhs) => {
                self.lhs.fmt_latex(f)?;
                write!(f, " \\cdot ")?;
                self.rhs.fmt_latex(f)
            },
            _ => {
                self.lhs.fmt_latex(f)?;
                self.op.fmt_latex(f)?;
                self.rhs.fmt_latex(f)
            },
        }
    }
}

/// Returns true if the expression starts with a digit when written out, where juxtaposition
/// would be misread as a longer number.
fn is_numeric(expr: &Expr) -> bool {
    use crate::parser::ast::literal::Literal;
    match expr {
        Expr::Literal(Literal::Integer(_) | Literal::Float(_)) => true,
        Expr::Binary(binary) => is_numeric(&binary.lhs),
        _ => false,
    }
}
