//! Evaluation of parsed expressions against a [`Namespace`].

mod binary;
mod call;
mod literal;
mod unary;

use gamma_error::Error;
use gamma_parser::parser::ast::{expr::Expr, paren::Paren};
use crate::namespace::Namespace;
use crate::value::Value;

/// Any type that can be evaluated to produce a value.
pub trait Eval {
    /// Evaluate the expression to produce a value, using the given namespace.
    fn eval(&self, ns: &Namespace) -> Result<Value, Error>;

    /// Evaluate the expression to produce a value, using the default namespace.
    fn eval_default(&self) -> Result<Value, Error> {
        self.eval(&Namespace::default())
    }
}

impl Eval for Expr {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        match self {
            Expr::Literal(literal) => literal.eval(ns),
            Expr::Paren(paren) => paren.eval(ns),
            Expr::Call(call) => call.eval(ns),
            Expr::Unary(unary) => unary.eval(ns),
            Expr::Binary(binary) => binary.eval(ns),
        }
    }
}

impl Eval for Paren {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        self.expr.eval(ns)
    }
}

/// Eval tests depend on the parser, so ensure that parser tests pass before running these.
#[cfg(test)]
mod tests {
    use super::*;

    use crate::symbolic::Expr as SymExpr;
    use pretty_assertions::assert_eq;

    fn eval(source: &str) -> Result<Value, Error> {
        let ns = Namespace::default();
        let expr = gamma_parser::parse(source, &ns).unwrap().unwrap();
        expr.eval(&ns)
    }

    fn eval_str(source: &str) -> String {
        eval(source).unwrap().to_string()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Expr(SymExpr::integer(7)));
        assert_eq!(eval_str("1/2 + 1/3"), "5/6");
        assert_eq!(eval_str("2^10"), "1024");
        assert_eq!(eval_str("7 % 3"), "1");
    }

    #[test]
    fn symbols_stay_symbolic() {
        assert_eq!(eval_str("x + x"), "2*x");
        assert_eq!(eval_str("2x"), "2*x");
        assert_eq!(eval("2x").unwrap(), eval("2*x").unwrap());
    }

    #[test]
    fn implicit_product_with_unbound_name() {
        assert_eq!(eval_str("x(y + 1)"), eval_str("x*(y + 1)"));
    }

    #[test]
    fn calls() {
        assert_eq!(eval_str("diff(x^2, x)"), "2*x");
        assert_eq!(eval_str("sin(pi)"), "0");
        assert_eq!(eval_str("solve(x^2 - 4, x)"), "[-2, 2]");
        assert_eq!(eval_str("factorint(12)"), "{2: 2, 3: 1}");
    }

    #[test]
    fn keyword_arguments() {
        assert_eq!(eval_str("series(exp(x), x, n=3)"), "1 + x + x^2/2 + O(x^3)");
    }

    #[test]
    fn factorial_operator() {
        assert_eq!(eval_str("5!"), "120");
    }

    #[test]
    fn bare_function_name() {
        assert_eq!(eval("sin").unwrap(), Value::Function("sin".to_string()));
    }

    #[test]
    fn list_literal() {
        assert_eq!(eval_str("[1, x]"), "[1, x]");
    }

    #[test]
    fn wrong_argument_type() {
        let err = eval("factorint(x)").unwrap_err();
        assert_eq!(err.message(), "mismatched types for argument #1 of the `factorint` function");
    }

    #[test]
    fn cancelled() {
        let mut ns = Namespace::default();
        let token = crate::cancel::CancelToken::new();
        token.cancel();
        ns.set_cancel_token(token);
        let expr = gamma_parser::parse("diff(x^2)", &ns).unwrap().unwrap();
        assert_eq!(expr.eval(&ns).unwrap_err().message(), "evaluation was cancelled");
    }
}
