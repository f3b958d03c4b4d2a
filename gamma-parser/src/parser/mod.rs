pub mod ast;
pub mod error;
pub mod fmt;
pub mod token;

use ast::expr::Expr;
use crate::{
    tokenizer::{Token, TokenKind},
    transform::{self, Bindings, NoBindings},
};
use gamma_error::{Error, ErrorKind};
use std::ops::Range;

/// The deepest an expression may nest, counting parentheses, call and list arguments, prefix
/// operators, and the operators of a chain such as `1 + 2 + 3`.
///
/// Everything downstream of the parser walks the tree recursively, so this bounds their stack use
/// as well.
pub const MAX_DEPTH: usize = 256;

/// A high-level parser for mathematical input. This is the type to use to parse an arbitrary
/// piece of text into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// How deeply the expression being parsed is nested.
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source, in an environment where no names are callable.
    pub fn new(source: &'source str) -> Self {
        Self::with_bindings(source, &NoBindings)
    }

    /// Create a new parser for the given source. The source is run through every
    /// [`transform`] pass, using `bindings` to decide which names are function calls.
    pub fn with_bindings(source: &'source str, bindings: &dyn Bindings) -> Self {
        Self::from_tokens(transform::transform(source, bindings))
    }

    /// Create a new parser over tokens that have already been transformed.
    pub fn from_tokens(tokens: Vec<Token<'source>>) -> Self {
        Self {
            tokens: tokens.into_boxed_slice(),
            cursor: 0,
            depth: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the kind of the token `offset` positions after the cursor, without moving it.
    pub fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.cursor + offset).map(|token| token.kind)
    }

    /// Returns true if there are no more tokens to parse.
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(error::UnexpectedEof))
    }

    /// Consumes the next token if it is of the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'source>> {
        match self.current_token() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.cursor += 1;
                Some(token)
            },
            _ => None,
        }
    }

    /// Descends one level into the expression tree. Fails if the input nests more than
    /// [`MAX_DEPTH`] levels deep.
    pub fn descend(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(error::NestingTooDeep { limit: MAX_DEPTH }));
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `f` one level deeper in the expression tree, restoring the depth afterwards.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        let depth = self.depth;
        let result = self.descend().and_then(|()| f(self));
        self.depth = depth;
        result
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        let (start, depth) = (self.cursor, self.depth);
        match T::parse(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                self.depth = depth;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        match self.current_token() {
            None => Ok(value),
            Some(token) if token.kind == TokenKind::CloseParen => {
                Err(self.error(error::UnclosedParenthesis { opening: false }))
            },
            Some(token) if token.kind == TokenKind::Symbol => {
                Err(self.error(error::InvalidCharacter { character: token.lexeme.to_string() }))
            },
            Some(_) => Err(self.error(error::ExpectedEof)),
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`. For unary
    /// operations, this means `a op op` is evaluated as `(a op) op` (the operators appear to the
    /// right of the operand).
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`), division (`/`), and modulo (`%`), which separate
    /// factors.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`^` and `**`).
    Exp,

    /// Precedence of factorial (`!`).
    Factorial,
}

/// Parses mathematical input into an expression, running every [`transform`] pass first.
///
/// Returns `Ok(None)` if the input contains nothing but whitespace.
pub fn parse(source: &str, bindings: &dyn Bindings) -> Result<Option<Expr>, Error> {
    let mut parser = Parser::with_bindings(source, bindings);
    if parser.is_eof() {
        return Ok(None);
    }
    parser.try_parse_full::<Expr>().map(Some)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        call::{Call, Kwarg},
        literal::{LitInt, LitList, LitSym, Literal},
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn callable(name: &str) -> bool {
        matches!(name, "diff" | "sin" | "series" | "plot")
    }

    fn parse_full(source: &str) -> Expr {
        Parser::with_bindings(source, &callable).try_parse_full::<Expr>().unwrap()
    }

    fn int(value: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Integer(LitInt { value: value.to_string(), span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse_full("16"), int("16", 0..2));
    }

    #[test]
    fn literal_symbol() {
        assert_eq!(parse_full("pi"), sym("pi", 0..2));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let source = format!("{}x{}", "(".repeat(300), ")".repeat(300));
        let err = parse(&source, &NoBindings).unwrap_err();
        assert_eq!(err.message(), "expression is nested too deeply");

        let source = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert!(parse(&source, &NoBindings).is_ok());
    }

    #[test]
    fn long_chains_count_towards_depth() {
        assert!(parse(&vec!["1"; 400].join(" + "), &NoBindings).is_err());
        assert!(parse(&vec!["1"; 100].join(" + "), &NoBindings).is_ok());
        assert!(parse(&format!("{}x", "-".repeat(300)), &NoBindings).is_err());
    }

    #[test]
    fn empty_input() {
        assert!(parse("", &NoBindings).unwrap().is_none());
        assert!(parse("  \t ", &NoBindings).unwrap().is_none());
    }

    #[test]
    fn unary_left_associativity() {
        assert_eq!(parse_full("3!!"), Expr::Unary(Unary {
            operand: Box::new(Expr::Unary(Unary {
                operand: Box::new(int("3", 0..1)),
                op: UnaryOp { kind: UnaryOpKind::Factorial, span: 1..2 },
                span: 0..2,
            })),
            op: UnaryOp { kind: UnaryOpKind::Factorial, span: 2..3 },
            span: 0..3,
        }));
    }

    #[test]
    fn negation_binds_looser_than_power() {
        assert_eq!(parse_full("-x^2"), Expr::Unary(Unary {
            operand: Box::new(Expr::Binary(Binary {
                lhs: Box::new(sym("x", 1..2)),
                op: BinOp { kind: BinOpKind::Exp, implicit: false, span: 2..3 },
                rhs: Box::new(int("2", 3..4)),
                span: 1..4,
            })),
            op: UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 },
            span: 0..4,
        }));
    }

    #[test]
    fn binary_left_associativity() {
        assert_eq!(parse_full("3 * x * 5"), Expr::Binary(Binary {
            lhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("3", 0..1)),
                op: BinOp { kind: BinOpKind::Mul, implicit: false, span: 2..3 },
                rhs: Box::new(sym("x", 4..5)),
                span: 0..5,
            })),
            op: BinOp { kind: BinOpKind::Mul, implicit: false, span: 6..7 },
            rhs: Box::new(int("5", 8..9)),
            span: 0..9,
        }));
    }

    #[test]
    fn power_right_associativity() {
        assert_eq!(parse_full("2**3^4"), Expr::Binary(Binary {
            lhs: Box::new(int("2", 0..1)),
            op: BinOp { kind: BinOpKind::Exp, implicit: false, span: 1..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int("3", 3..4)),
                op: BinOp { kind: BinOpKind::Exp, implicit: false, span: 4..5 },
                rhs: Box::new(int("4", 5..6)),
                span: 3..6,
            })),
            span: 0..6,
        }));
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(parse_full("2x"), Expr::Binary(Binary {
            lhs: Box::new(int("2", 0..1)),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 1..1 },
            rhs: Box::new(sym("x", 1..2)),
            span: 0..2,
        }));
    }

    #[test]
    fn implicit_multiplication_precedence() {
        // `2x^2` is `2 * (x^2)`
        let expr = parse_full("2x^2 + 1");
        assert_eq!(expr.to_string(), "2*x^2 + 1");
    }

    #[test]
    fn call_with_keywords() {
        assert_eq!(parse_full("series(x, n=4)"), Expr::Call(Call {
            name: LitSym { name: "series".to_string(), span: 0..6 },
            args: vec![sym("x", 7..8)],
            kwargs: vec![Kwarg {
                name: LitSym { name: "n".to_string(), span: 10..11 },
                value: int("4", 12..13),
            }],
            span: 0..14,
            paren_span: 6..14,
        }));
    }

    #[test]
    fn call_with_list_argument() {
        assert_eq!(parse_full("plot([x, 2])"), Expr::Call(Call {
            name: LitSym { name: "plot".to_string(), span: 0..4 },
            args: vec![Expr::Literal(Literal::List(LitList {
                values: vec![sym("x", 6..7), int("2", 9..10)],
                span: 5..11,
            }))],
            kwargs: vec![],
            span: 0..12,
            paren_span: 4..12,
        }));
    }

    #[test]
    fn unbound_name_before_paren_is_product() {
        let expr = parse_full("f(x + 1)");
        assert_eq!(expr.to_string(), "f*(x + 1)");
    }

    #[test]
    fn display_is_normalized() {
        assert_eq!(parse_full("diff(x^2,x)").to_string(), "diff(x^2, x)");
        assert_eq!(parse_full("derivative(x**2 , x)").to_string(), "diff(x^2, x)");
        assert_eq!(parse_full("series(sin(x),x,n=3)").to_string(), "series(sin(x), x, n=3)");
    }

    #[test]
    fn error_unclosed_paren() {
        let err = Parser::with_bindings("diff(x^2, x", &callable)
            .try_parse_full::<Expr>()
            .unwrap_err();
        assert_eq!(err.message(), "unclosed parenthesis");
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn error_stray_close_paren() {
        let err = parse("x + 1)", &NoBindings).unwrap_err();
        assert_eq!(err.message(), "unclosed parenthesis");
        assert_eq!(err.offset(), 5);
    }

    #[test]
    fn error_trailing_operator() {
        let err = parse("x +", &NoBindings).unwrap_err();
        assert_eq!(err.message(), "unexpected end of input");
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn error_invalid_character() {
        let err = parse("2 $ 3", &NoBindings).unwrap_err();
        assert_eq!(err.message(), "invalid character `$`");
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn error_positional_after_keyword() {
        let err = parse("series(x, n=3, 0)", &callable).unwrap_err();
        assert_eq!(err.message(), "positional argument follows keyword argument");
        assert_eq!(err.offset(), 15);
    }

    #[test]
    fn error_empty_parens() {
        let err = parse("2 + ()", &NoBindings).unwrap_err();
        assert_eq!(err.message(), "missing expression inside parenthesis");
    }
}
