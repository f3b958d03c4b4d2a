//! Binary and unary operators.

use crate::{
    parser::{error::UnexpectedToken, fmt::Latex, Associativity, Parse, Parser, Precedence},
    tokenizer::TokenKind,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Neg,
    Pos,
    Factorial,
}

impl UnaryOpKind {
    /// Returns the precedence of the unary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Neg | Self::Pos => Precedence::Neg,
            Self::Factorial => Precedence::Factorial,
        }
    }

    /// Returns the associativity of the unary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Neg | Self::Pos => Associativity::Right,
            Self::Factorial => Associativity::Left,
        }
    }

    /// Returns the unary operation a token stands for, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Sub => Some(Self::Neg),
            TokenKind::Add => Some(Self::Pos),
            TokenKind::Factorial => Some(Self::Factorial),
            _ => None,
        }
    }
}

/// A unary operator that takes one operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Returns the precedence of the unary operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the unary operator.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = UnaryOpKind::from_token(token.kind).ok_or_else(|| {
            Error::new(vec![token.span.clone()], UnexpectedToken {
                expected: &[TokenKind::Sub, TokenKind::Add, TokenKind::Factorial],
                found: token.kind,
            })
        })?;

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            UnaryOpKind::Neg => write!(f, "-"),
            UnaryOpKind::Pos => write!(f, "+"),
            UnaryOpKind::Factorial => write!(f, "!"),
        }
    }
}

impl Latex for UnaryOp {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div | Self::Mod => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            Self::Mul | Self::Div | Self::Mod | Self::Add | Self::Sub => Associativity::Left,
        }
    }

    /// Returns the binary operation a token stands for, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Pow => Some(Self::Exp),
            TokenKind::Mul => Some(Self::Mul),
            TokenKind::Div => Some(Self::Div),
            TokenKind::Mod => Some(Self::Mod),
            TokenKind::Add => Some(Self::Add),
            TokenKind::Sub => Some(Self::Sub),
            _ => None,
        }
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// Whether this binary operator was inserted by implicit multiplication.
    pub implicit: bool,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the precedence of the binary operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the binary operator.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = BinOpKind::from_token(token.kind).ok_or_else(|| {
            Error::new(vec![token.span.clone()], UnexpectedToken {
                expected: &[
                    TokenKind::Pow,
                    TokenKind::Mul,
                    TokenKind::Div,
                    TokenKind::Mod,
                    TokenKind::Add,
                    TokenKind::Sub,
                ],
                found: token.kind,
            })
        })?;

        Ok(Self {
            kind,
            implicit: token.is_synthetic(),
            span: token.span,
        })
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            BinOpKind::Exp => write!(f, "^"),
            BinOpKind::Mul => write!(f, "*"),
            BinOpKind::Div => write!(f, "/"),
            BinOpKind::Mod => write!(f, " % "),
            BinOpKind::Add => write!(f, " + "),
            BinOpKind::Sub => write!(f, " - "),
        }
    }
}

impl Latex for BinOp {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            BinOpKind::Exp => write!(f, "^"),
            BinOpKind::Mul if self.implicit => write!(f, " "),
            BinOpKind::Mul => write!(f, " \\cdot "),
            BinOpKind::Div => write!(f, " / "),
            BinOpKind::Mod => write!(f, " \\bmod "),
            BinOpKind::Add => write!(f, " + "),
            BinOpKind::Sub => write!(f, " - "),
        }
    }
}
