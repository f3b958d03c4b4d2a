//! Differentiation, integration, and series expansion.

use crate::builtin::{Args, Builtin, BuiltinError, BuiltinParam, ParamKind};
use crate::cancel::CancelToken;
use crate::error::Cancelled;
use crate::symbolic::{self, DerivativeError, Expr, IntegralError, SeriesError};
use crate::value::Value;
use num_traits::ToPrimitive;
use super::helper::{as_symbol, infer_symbol, take_symbol, EXPR, SYMBOL};

/// The largest number of repeated derivatives or series terms computed in one call.
const MAX_ORDER: usize = 100;

fn derivative_error(name: &str, err: DerivativeError) -> BuiltinError {
    match err {
        DerivativeError::Unsupported(function) => {
            BuiltinError::unsupported(name, format!("no derivative is known for `{}`", function))
        },
    }
}

/// Differentiates an expression: `diff(f)`, `diff(f, x)`, `diff(f, x, 2)`, `diff(f, x, y)`.
#[derive(Debug)]
pub struct Diff;

impl Builtin for Diff {
    fn name(&self) -> &'static str {
        "diff"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[
            EXPR,
            BuiltinParam { name: "symbols", kind: ParamKind::Variadic, typename: Some("symbol") },
        ]
    }

    fn sig_str(&self) -> &'static str {
        "f, *symbols"
    }

    fn eval(&self, mut args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError> {
        let mut expr = args.expr(0)?;

        // each symbol may be followed by the number of times to differentiate
        let mut order: Vec<String> = Vec::new();
        for (i, value) in args.rest().iter().enumerate() {
            if let Some(symbol) = as_symbol(value) {
                order.push(symbol);
                continue;
            }
            let repeat = value
                .as_expr()
                .and_then(Expr::as_small_integer)
                .and_then(|n| n.to_usize())
                .filter(|n| *n <= MAX_ORDER);
            match (repeat, order.last().cloned()) {
                (Some(n), Some(symbol)) => order.extend(std::iter::repeat(symbol).take(n.saturating_sub(1))),
                (Some(n), None) => {
                    let symbol = infer_symbol(self.name(), &expr)?;
                    order.extend(std::iter::repeat(symbol).take(n));
                },
                (None, _) => return Err(args.mismatch(i + 1, value.typename())),
            }
        }
        if order.is_empty() {
            order.push(infer_symbol(self.name(), &expr)?);
        }

        for symbol in order {
            if cancel.is_cancelled() {
                return Err(BuiltinError::Cancelled(Cancelled));
            }
            expr = symbolic::derivative(&expr, &symbol).map_err(|err| derivative_error(self.name(), err))?;
        }
        Ok(Value::Expr(expr))
    }
}

/// Integrates an expression: `integrate(f)`, `integrate(f, x)`, or the definite integral
/// `integrate(f, [x, a, b])`.
#[derive(Debug)]
pub struct Integrate;

impl Builtin for Integrate {
    fn name(&self) -> &'static str {
        "integrate"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[EXPR, SYMBOL]
    }

    fn sig_str(&self) -> &'static str {
        "f, symbol"
    }

    fn eval(&self, mut args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError> {
        let expr = args.expr(0)?;
        let (symbol, bounds) = match args.take(1) {
            Some(Value::List(items)) => match items.as_slice() {
                [symbol, Value::Expr(lower), Value::Expr(upper)] => {
                    let symbol = as_symbol(symbol).ok_or_else(|| args.mismatch(1, symbol.typename()))?;
                    (symbol, Some((lower.clone(), upper.clone())))
                },
                _ => return Err(args.mismatch(1, "list")),
            },
            Some(value) => (as_symbol(&value).ok_or_else(|| args.mismatch(1, value.typename()))?, None),
            None => (infer_symbol(self.name(), &expr)?, None),
        };

        let antiderivative = symbolic::integrate(&expr, &symbol, cancel).map_err(|err| match err {
            IntegralError::Unsupported(_) => {
                BuiltinError::unsupported(self.name(), "no elementary antiderivative was found")
            },
            IntegralError::Cancelled => BuiltinError::Cancelled(Cancelled),
        })?;
        Ok(Value::Expr(match bounds {
            Some((lower, upper)) => symbolic::integrate::definite(&antiderivative, &symbol, &lower, &upper),
            None => antiderivative,
        }))
    }
}

/// Computes the Taylor series of an expression: `series(f, x, x0, n)`.
#[derive(Debug)]
pub struct Series;

impl Builtin for Series {
    fn name(&self) -> &'static str {
        "series"
    }

    fn sig(&self) -> &'static [BuiltinParam] {
        &[
            EXPR,
            BuiltinParam { name: "x", ..SYMBOL },
            BuiltinParam { name: "x0", kind: ParamKind::Optional, typename: Some("expression") },
            BuiltinParam { name: "n", kind: ParamKind::Optional, typename: Some("integer") },
        ]
    }

    fn sig_str(&self) -> &'static str {
        "f, x, x0 = 0, n = 6"
    }

    fn eval(&self, mut args: Args, cancel: &CancelToken) -> Result<Value, BuiltinError> {
        let expr = args.expr(0)?;
        let symbol = take_symbol(&mut args, 1, self.name(), &expr)?;
        let x0 = args.take_expr(2)?.unwrap_or_else(Expr::zero);
        let n = match args.take_expr(3)? {
            Some(n) => n
                .as_small_integer()
                .and_then(|n| n.to_usize())
                .filter(|n| *n <= MAX_ORDER)
                .ok_or_else(|| args.mismatch(3, "expression"))?,
            None => 6,
        };

        symbolic::series(&expr, &symbol, &x0, n, cancel)
            .map(Value::Expr)
            .map_err(|err| match err {
                SeriesError::Derivative(err) => derivative_error(self.name(), err),
                SeriesError::Singular => BuiltinError::unsupported(
                    self.name(),
                    format!("the expression is not analytic at {} = {}", symbol, x0),
                ),
                SeriesError::Cancelled => BuiltinError::Cancelled(Cancelled),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::symbolic::elementary::apply;
    use pretty_assertions::assert_eq;

    fn call(builtin: &dyn Builtin, positional: Vec<Value>) -> Result<Value, BuiltinError> {
        let args = Args::bind(builtin, positional, vec![])?;
        builtin.eval(args, &CancelToken::new())
    }

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn diff_infers_symbol() {
        let value = call(&Diff, vec![x().pow(Expr::integer(3)).into()]).unwrap();
        assert_eq!(value.to_string(), "3*x^2");
    }

    #[test]
    fn diff_repeated() {
        let value = call(&Diff, vec![x().pow(Expr::integer(3)).into(), x().into(), Expr::integer(2).into()]).unwrap();
        assert_eq!(value.to_string(), "6*x");
    }

    #[test]
    fn diff_ambiguous_variable() {
        let expr = x() * Expr::symbol("y");
        let err = call(&Diff, vec![expr.into()]).unwrap_err();
        assert!(matches!(err, BuiltinError::Unsupported(_)));
    }

    #[test]
    fn definite_integral() {
        let bounds = Value::List(vec![x().into(), Expr::zero().into(), Expr::integer(2).into()]);
        let value = call(&Integrate, vec![x().into(), bounds]).unwrap();
        assert_eq!(value, Value::Expr(Expr::integer(2)));
    }

    #[test]
    fn series_defaults() {
        let sin = apply("sin", vec![x()]);
        let value = call(&Series, vec![sin.into()]).unwrap();
        assert_eq!(value.to_string(), "x - x^3/6 + x^5/120 + O(x^6)");
    }

    #[test]
    fn series_keyword_order() {
        let exp = apply("exp", vec![x()]);
        let args = Args::bind(
            &Series,
            vec![exp.into(), x().into()],
            vec![("n".to_string(), Expr::integer(3).into())],
        ).unwrap();
        let value = Series.eval(args, &CancelToken::new()).unwrap();
        assert_eq!(value.to_string(), "1 + x + x^2/2 + O(x^3)");
    }

    #[test]
    fn cancelled_diff() {
        let token = CancelToken::new();
        token.cancel();
        let args = Args::bind(&Diff, vec![x().into()], vec![]).unwrap();
        assert!(Diff.eval(args, &token).unwrap_err().is_cancelled());
    }
}
