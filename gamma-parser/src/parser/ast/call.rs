use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error,
        fmt::{function_latex, Latex},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use gamma_error::Error;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A keyword argument in a function call, such as `n=10` in `series(f, x, n=10)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Kwarg {
    /// The name of the argument.
    pub name: LitSym,

    /// The value of the argument.
    pub value: Expr,
}

impl Kwarg {
    /// Returns the span of the keyword argument, from its name to the end of its value.
    pub fn span(&self) -> Range<usize> {
        self.name.span.start..self.value.span().end
    }
}

/// A function call, such as `diff(x^2, x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The positional arguments to the function.
    pub args: Vec<Expr>,

    /// The keyword arguments to the function, in the order they were written.
    pub kwargs: Vec<Kwarg>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns a set of two spans, where the first is the span of the function name (with the
    /// opening parenthesis) and the second is the span of the closing parenthesis.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [
            self.name.span.start..self.paren_span.start + 1,
            self.paren_span.end - 1..self.paren_span.end,
        ]
    }

    /// Returns the keyword argument with the given name.
    pub fn kwarg(&self, name: &str) -> Option<&Expr> {
        self.kwargs
            .iter()
            .find(|kwarg| kwarg.name.name == name)
            .map(|kwarg| &kwarg.value)
    }

    /// Parses the argument at the cursor: a keyword argument if it starts with `name=`,
    /// otherwise a positional argument.
    fn parse_argument(input: &mut Parser, call: &mut Call) -> Result<(), Error> {
        if input.peek_kind(0) == Some(TokenKind::Name) && input.peek_kind(1) == Some(TokenKind::Assign) {
            let name_token = input.next_token()?;
            input.next_token()?;
            let value = input.try_parse::<Expr>()?;
            let name = LitSym {
                name: name_token.lexeme.to_owned(),
                span: name_token.span,
            };

            if let Some(existing) = call.kwargs.iter().find(|kwarg| kwarg.name.name == name.name) {
                return Err(Error::new(
                    vec![name.span.clone(), existing.name.span.clone()],
                    error::DuplicateKeyword { name: name.name },
                ));
            }

            call.kwargs.push(Kwarg { name, value });
        } else {
            let value = input.try_parse::<Expr>()?;
            if let Some(last_kwarg) = call.kwargs.last() {
                return Err(Error::new(
                    vec![value.span(), last_kwarg.span()],
                    error::PositionalAfterKeyword,
                ));
            }
            call.args.push(value);
        }

        Ok(())
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name_token = input.next_token()?;
        if name_token.kind != TokenKind::Name {
            return Err(Error::new(vec![name_token.span], error::UnexpectedToken {
                expected: &[TokenKind::Name],
                found: name_token.kind,
            }));
        }

        let open_paren = input.eat(TokenKind::OpenParen).ok_or_else(|| {
            input.error(error::UnexpectedToken {
                expected: &[TokenKind::OpenParen],
                found: input.peek_kind(0).unwrap_or(TokenKind::NewLine),
            })
        })?;

        let mut call = Call {
            name: LitSym {
                name: name_token.lexeme.to_owned(),
                span: name_token.span.clone(),
            },
            args: Vec::new(),
            kwargs: Vec::new(),
            span: name_token.span.clone(),
            paren_span: open_paren.span.clone(),
        };
        let unclosed = || Error::new(vec![open_paren.span.clone()], error::UnclosedParenthesis { opening: true });

        loop {
            if let Some(close_paren) = input.eat(TokenKind::CloseParen) {
                call.span = name_token.span.start..close_paren.span.end;
                call.paren_span = open_paren.span.start..close_paren.span.end;
                return Ok(call);
            }
            if input.is_eof() {
                return Err(unclosed());
            }

            Self::parse_argument(input, &mut call)?;

            if input.eat(TokenKind::Comma).is_none() {
                match input.peek_kind(0) {
                    Some(TokenKind::CloseParen) => {},
                    None => return Err(unclosed()),
                    Some(found) => return Err(input.error(error::UnexpectedToken {
                        expected: &[TokenKind::Comma, TokenKind::CloseParen],
                        found,
                    })),
                }
            }
        }
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(f)?;
        write!(f, "(")?;
        let mut first = true;
        for arg in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            arg.fmt(f)?;
            first = false;
        }
        for kwarg in &self.kwargs {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", kwarg.name, kwarg.value)?;
            first = false;
        }
        write!(f, ")")
    }
}

/// Writes the expression, wrapping it in parentheses if it is a sum or difference.
fn fmt_operand(f: &mut fmt::Formatter, expr: &Expr) -> fmt::Result {
    use crate::parser::token::op::BinOpKind;
    match expr.innermost() {
        Expr::Binary(binary) if matches!(binary.op.kind, BinOpKind::Add | BinOpKind::Sub) => {
            write!(f, "\\left(")?;
            binary.fmt_latex(f)?;
            write!(f, "\\right)")
        },
        inner => inner.fmt_latex(f),
    }
}

impl Latex for Call {
    fn fmt_latex(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fmt_args = |f: &mut fmt::Formatter, args: &[Expr]| -> fmt::Result {
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                arg.fmt_latex(f)?;
            }
            Ok(())
        };

        match (self.name.name.as_str(), self.args.as_slice()) {
            ("sqrt", [arg]) => {
                write!(f, "\\sqrt{{")?;
                arg.innermost().fmt_latex(f)?;
                write!(f, "}}")
            },
            ("Abs", [arg]) => {
                write!(f, "\\left|")?;
                arg.innermost().fmt_latex(f)?;
                write!(f, "\\right|")
            },
            ("diff", [expr, var, ..]) => {
                write!(f, "\\frac{{d}}{{d {}}} ", var.as_display())?;
                fmt_operand(f, expr)
            },
            ("integrate", [expr, var, ..]) => {
                write!(f, "\\int ")?;
                fmt_operand(f, expr)?;
                write!(f, "\\, d{}", var.as_display())
            },
            ("integrate", [expr]) => {
                write!(f, "\\int ")?;
                fmt_operand(f, expr)
            },
            (name, args) => {
                match function_latex(name) {
                    Some(command) => write!(f, "{}", command)?,
                    None => write!(f, "\\operatorname{{{}}}", name)?,
                }
                write!(f, "{{\\left(")?;
                fmt_args(f, args)?;
                for (i, kwarg) in self.kwargs.iter().enumerate() {
                    if i > 0 || !args.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", kwarg.name, kwarg.value.as_display())?;
                }
                write!(f, " \\right)}}")
            },
        }
    }
}
