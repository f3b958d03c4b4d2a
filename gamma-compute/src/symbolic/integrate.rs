//! Term-wise antiderivatives of polynomial and elementary expressions.

use crate::cancel::CancelToken;
use crate::error::Cancelled;
use super::algebra::expand;
use super::build::{add, mul, pow};
use super::derivative::derivative;
use super::elementary::apply;
use super::expr::{Expr, Primary};

/// The reason an antiderivative could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegralError {
    /// No rule applies to the given term.
    Unsupported(Expr),

    /// The request was cancelled.
    Cancelled,
}

impl From<Cancelled> for IntegralError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Computes an antiderivative of the expression with respect to the symbol `var`. No constant of
/// integration is added.
pub fn integrate(expr: &Expr, var: &str, cancel: &CancelToken) -> Result<Expr, IntegralError> {
    match integrate_term(expr, var, cancel) {
        Err(IntegralError::Unsupported(term)) => {
            let expanded = expand(expr, cancel)?;
            if expanded == *expr {
                Err(IntegralError::Unsupported(term))
            } else {
                integrate_term(&expanded, var, cancel)
            }
        },
        result => result,
    }
}

fn integrate_term(expr: &Expr, var: &str, cancel: &CancelToken) -> Result<Expr, IntegralError> {
    if cancel.is_cancelled() {
        return Err(IntegralError::Cancelled);
    }
    let x = Expr::symbol(var);
    if !expr.has_symbol(var) {
        return Ok(mul(vec![expr.clone(), x]));
    }

    let unsupported = || IntegralError::Unsupported(expr.clone());
    match expr {
        Expr::Primary(Primary::Symbol(_)) => Ok(mul(vec![
            Expr::number(crate::primitive::rational(1, 2)),
            pow(x, Expr::integer(2)),
        ])),
        Expr::Primary(Primary::Call(name, args)) => {
            let [u] = args.as_slice() else {
                return Err(unsupported());
            };
            let slope = linear_slope(u, var).ok_or_else(unsupported)?;
            let call = |function: &str| apply(function, vec![u.clone()]);
            let antiderivative = match name.as_str() {
                "sin" => -call("cos"),
                "cos" => call("sin"),
                "exp" => call("exp"),
                "sinh" => call("cosh"),
                "cosh" => call("sinh"),
                "tan" => -apply("log", vec![call("cos")]),
                "log" => add(vec![mul(vec![u.clone(), call("log")]), -u.clone()]),
                _ => return Err(unsupported()),
            };
            Ok(mul(vec![antiderivative, pow(slope, Expr::integer(-1))]))
        },
        Expr::Primary(_) => Err(unsupported()),
        Expr::Add(terms) => Ok(add(terms
            .iter()
            .map(|term| integrate(term, var, cancel))
            .collect::<Result<_, _>>()?)),
        Expr::Mul(factors) => {
            let (constant, dependent): (Vec<_>, Vec<_>) = factors
                .iter()
                .cloned()
                .partition(|factor| !factor.has_symbol(var));
            match dependent.as_slice() {
                [single] => {
                    let mut result = constant;
                    result.push(integrate_term(single, var, cancel)?);
                    Ok(mul(result))
                },
                _ => Err(unsupported()),
            }
        },
        Expr::Exp(base, exp) => {
            if !exp.has_symbol(var) {
                // (a x + b)^n
                let slope = linear_slope(base, var).ok_or_else(unsupported)?;
                let scale = pow(slope, Expr::integer(-1));
                if **exp == Expr::integer(-1) {
                    return Ok(mul(vec![scale, apply("log", vec![base.as_ref().clone()])]));
                }
                let raised = add(vec![exp.as_ref().clone(), Expr::one()]);
                Ok(mul(vec![
                    scale,
                    pow(base.as_ref().clone(), raised.clone()),
                    pow(raised, Expr::integer(-1)),
                ]))
            } else if !base.has_symbol(var) {
                // b^(a x + c)
                let slope = linear_slope(exp, var).ok_or_else(unsupported)?;
                let log_base = apply("log", vec![base.as_ref().clone()]);
                Ok(mul(vec![
                    expr.clone(),
                    pow(mul(vec![slope, log_base]), Expr::integer(-1)),
                ]))
            } else {
                Err(unsupported())
            }
        },
    }
}

/// Returns `a` if `u = a*var + b` with `a` non-zero and free of `var`.
fn linear_slope(u: &Expr, var: &str) -> Option<Expr> {
    let slope = derivative(u, var).ok()?;
    (!slope.is_zero() && !slope.has_symbol(var)).then_some(slope)
}

/// Evaluates the definite integral of `expr` over `[lower, upper]` from an antiderivative.
pub fn definite(antiderivative: &Expr, var: &str, lower: &Expr, upper: &Expr) -> Expr {
    let at_upper = super::algebra::subs(antiderivative, var, upper);
    let at_lower = super::algebra::subs(antiderivative, var, lower);
    add(vec![at_upper, -at_lower])
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn i(expr: Expr) -> String {
        integrate(&expr, "x", &CancelToken::new()).unwrap().to_string()
    }

    #[test]
    fn powers() {
        assert_eq!(i(x().pow(Expr::integer(2))), "x^3/3");
        assert_eq!(i(x()), "x^2/2");
        assert_eq!(i(Expr::integer(2) * x() + Expr::one()), "x^2 + x");
        assert_eq!(i(x().pow(Expr::integer(-1))), "log(x)");
    }

    #[test]
    fn elementary() {
        assert_eq!(i(apply("sin", vec![x()])), "-cos(x)");
        assert_eq!(i(apply("exp", vec![Expr::integer(2) * x()])), "exp(2*x)/2");
        assert_eq!(i(apply("log", vec![x()])), "x*log(x) - x");
    }

    #[test]
    fn expands_products() {
        let expr = Expr::Mul(vec![x() + Expr::one(), x()]);
        assert_eq!(i(expr), "x^3/3 + x^2/2");
    }

    #[test]
    fn definite_integral() {
        let antiderivative = integrate(&x().pow(Expr::integer(2)), "x", &CancelToken::new()).unwrap();
        let value = definite(&antiderivative, "x", &Expr::zero(), &Expr::integer(3));
        assert_eq!(value, Expr::integer(9));
    }

    #[test]
    fn unsupported_product() {
        let expr = x() * apply("sin", vec![x()]);
        assert!(integrate(&expr, "x", &CancelToken::new()).is_err());
    }

    #[test]
    fn cancelled_expansion() {
        let expr = (x() * Expr::symbol("y") + x() + Expr::symbol("z")).pow(Expr::integer(40));
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(integrate(&expr, "x", &token), Err(IntegralError::Cancelled));
    }
}
