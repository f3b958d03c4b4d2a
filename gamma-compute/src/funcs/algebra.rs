//! Equation solving and algebraic rewriting.

use crate::builtin::{Args, Builtin, BuiltinError, BuiltinParam, ParamKind};
use crate::cancel::CancelToken;
use crate::error::Cancelled;
use crate::symbolic::{self, SolveError};
use crate::value::Value;
use super::helper::{as_symbol, take_symbol, EXPR, SYMBOL};

/// Solves `f = 0`, returning the list of solutions.
#[derive(Debug)]
pub struct Solve;

impl Builtin for Solve {
    fn name(&self) -> &'static str {
        "solve"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[EXPR, SYMBOL]
    }

    fn sig_str(&self) -> &'static str {
        "f, symbol"
    }

    fn eval(&self, mut args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError> {
        let expr = args.expr(0)?;
        if expr.free_symbols().is_empty() && args.get(1).is_none() {
            return Ok(Value::List(Vec::new()));
        }

        let symbol = take_symbol(&mut args, 1, self.name(), &expr)?;
        match symbolic::solve(&expr, &symbol, cancel) {
            Ok(solutions) => Ok(Value::List(solutions.into_iter().map(Value::Expr).collect())),
            Err(SolveError::NotPolynomial) => Err(BuiltinError::unsupported(
                self.name(),
                format!("the expression is not a polynomial in {}", symbol),
            )),
            Err(SolveError::DegreeTooHigh(degree)) => Err(BuiltinError::unsupported(
                self.name(),
                format!("no closed form is known for the remaining degree {} factor", degree),
            )),
            Err(SolveError::Cancelled) => Err(BuiltinError::Cancelled(Cancelled)),
        }
    }
}

/// Generates a builtin that rewrites its single expression argument.
macro_rules! rewrite {
    ($(#[$meta:meta])* $upname:ident $name:literal => $func:path) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $upname;

        impl Builtin for $upname {
            fn name(&self) -> &'static str {
                $name
            }

            fn sig(&self) -> &'static [BuiltinParam] {
                &[EXPR]
            }

            fn sig_str(&self) -> &'static str {
                "f"
            }

            fn eval(&self, mut args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError> {
                let expr = args.expr(0)?;
                $func(&expr, cancel).map(Value::Expr).map_err(BuiltinError::Cancelled)
            }
        }
    };
}

rewrite!(
    /// Factors a polynomial over the rationals.
    Factor "factor" => symbolic::factor
);
rewrite!(
    /// Multiplies out products and integer powers of sums.
    Expand "expand" => symbolic::expand
);
rewrite!(
    /// Returns the simplest equivalent form found.
    Simplify "simplify" => symbolic::simplify
);

/// Substitutes a value for a symbol: `subs(f, x, 2)`.
#[derive(Debug)]
pub struct Subs;

impl Builtin for Subs {
    fn name(&self) -> &'static str {
        "subs"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[
            EXPR,
            BuiltinParam { name: "old", kind: ParamKind::Required, typename: Some("symbol") },
            BuiltinParam { name: "new", kind: ParamKind::Required, typename: Some("expression") },
        ]
    }

    fn sig_str(&self) -> &'static str {
        "f, old, new"
    }

    fn eval(&self, mut args: Args, _: &CancelToken) -> Result<Value, BuiltinError> {
        let expr = args.expr(0)?;
        let old = args.take(1).unwrap_or(Value::None);
        let symbol = as_symbol(&old).ok_or_else(|| args.mismatch(1, old.typename()))?;
        let new = args.expr(2)?;
        Ok(Value::Expr(symbolic::subs(&expr, &symbol, &new)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::symbolic::Expr;
    use pretty_assertions::assert_eq;

    fn call(builtin: &dyn Builtin, positional: Vec<Value>) -> Result<Value, BuiltinError> {
        let args = Args::bind(builtin, positional, vec![])?;
        builtin.eval(args, &CancelToken::new())
    }

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn solve_quadratic() {
        let expr = x().pow(Expr::integer(2)) - Expr::one();
        let value = call(&Solve, vec![expr.into()]).unwrap();
        assert_eq!(value.to_string(), "[-1, 1]");
    }

    #[test]
    fn solve_constant() {
        let value = call(&Solve, vec![Expr::integer(3).into()]).unwrap();
        assert_eq!(value, Value::List(vec![]));
    }

    #[test]
    fn factor_difference_of_squares() {
        let expr = x().pow(Expr::integer(2)) - Expr::one();
        let value = call(&Factor, vec![expr.into()]).unwrap();
        assert_eq!(value.to_string(), "(x - 1)*(x + 1)");
    }

    #[test]
    fn subs_number() {
        let expr = x().pow(Expr::integer(2)) + x();
        let value = call(&Subs, vec![expr.into(), x().into(), Expr::integer(3).into()]).unwrap();
        assert_eq!(value, Value::Expr(Expr::integer(12)));
    }

    #[test]
    fn subs_requires_symbol() {
        let err = call(&Subs, vec![x().into(), Expr::integer(1).into(), Expr::integer(3).into()]).unwrap_err();
        assert!(matches!(err, BuiltinError::TypeMismatch(_)));
    }

    #[test]
    fn rewrites_stop_when_cancelled() {
        let sum = x() + Expr::symbol("y") + Expr::one();
        let args = Args::bind(&Expand, vec![sum.pow(Expr::integer(30)).into()], vec![]).unwrap();
        let token = CancelToken::new();
        token.cancel();
        assert!(Expand.eval(args, &token).unwrap_err().is_cancelled());
    }
}
